//! 仿真事件：应用层消息到达、分组到达、定时器到期

use tracing::{debug, trace};

use super::world::EmuWorld;
use crate::arq::{Message, Packet, Side};
use crate::sim::{Event, Simulator, World};
use crate::viz::VizEventKind;

fn emu_world(world: &mut dyn World) -> &mut EmuWorld {
    world
        .as_any_mut()
        .downcast_mut::<EmuWorld>()
        .expect("world must be EmuWorld")
}

/// 应用层产生下一条消息交给 A 端，并调度再下一条。
///
/// 第 n 条消息是 20 个 `'a' + n % 26`。窗口满时消息被丢弃（只计数）。
#[derive(Debug)]
pub struct AppArrival;

impl Event for AppArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = emu_world(world);
        if w.net.generated >= w.net.cfg.msgs {
            return;
        }

        let n = w.net.generated;
        w.net.generated += 1;
        if w.net.generated < w.net.cfg.msgs {
            let gap = w.net.next_interarrival();
            sim.schedule_in(gap, AppArrival);
        }

        let msg = Message::filled(b'a' + (n % 26) as u8);
        let (entity, net) = w.split(Side::A);
        let accepted = entity.output(msg, &mut net.bind(sim)).is_ok();
        if accepted {
            net.accepted.push(msg.data);
        }
        trace!(n, accepted, "应用层消息");
        net.viz(sim.now(), VizEventKind::AppMessage { n, accepted });
    }
}

/// 分组经信道到达 `to` 端
#[derive(Debug)]
pub struct PacketArrival {
    pub to: Side,
    pub pkt: Packet,
}

impl Event for PacketArrival {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let PacketArrival { to, pkt } = *self;
        let w = emu_world(world);
        w.net.viz(
            sim.now(),
            VizEventKind::Arrive {
                to,
                seqnum: pkt.seqnum,
                acknum: pkt.acknum,
            },
        );

        let (entity, net) = w.split(to);
        entity.input(pkt, &mut net.bind(sim));
    }
}

/// 定时器到期；代号过期（已被重启替换）时什么也不做
#[derive(Debug)]
pub struct TimerInterrupt {
    pub side: Side,
    pub generation: u64,
}

impl Event for TimerInterrupt {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TimerInterrupt { side, generation } = *self;
        let w = emu_world(world);
        if !w.net.timer_mut(side).fire(generation) {
            trace!(?side, generation, "过期的定时器事件");
            return;
        }
        // 还有消息要来且窗口为空时的超时不算停滞
        if side == Side::A && (w.sender.outstanding() > 0 || w.net.generated >= w.net.cfg.msgs) {
            w.net.idle_timeouts = w.net.idle_timeouts.saturating_add(1);
        }
        debug!(?side, now = sim.now().as_units(), idle = w.net.idle_timeouts, "定时器到期");
        w.net.viz(sim.now(), VizEventKind::Timeout { side });

        let (entity, net) = w.split(side);
        entity.timer_interrupt(&mut net.bind(sim));
    }
}
