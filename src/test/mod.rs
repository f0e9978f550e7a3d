mod channel;
mod sender;
