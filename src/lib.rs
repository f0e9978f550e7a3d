pub mod arq;
pub mod emu;
pub mod sim;
pub mod viz;

#[cfg(test)]
mod test;
