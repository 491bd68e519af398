use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::ctx::TickCtx;

/// Shared, identity-compared registrant handle stored by the loop.
pub type SharedRegistrant = Rc<RefCell<dyn Registrant>>;

/// One of the three ordered sub-steps of a tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    EarlyUpdate,
    Update,
    LateUpdate,
}

impl Phase {
    /// Phases in dispatch order.
    pub const ALL: [Phase; 3] = [Phase::EarlyUpdate, Phase::Update, Phase::LateUpdate];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::EarlyUpdate => "early_update",
            Phase::Update => "update",
            Phase::LateUpdate => "late_update",
        })
    }
}

/// Per-tick callback contract.
///
/// Every phase has a no-op default, so implementors only override the phases
/// they care about. `dt` is the time since the previous tick in milliseconds.
///
/// Returning an error aborts the remaining registrants of the same phase for
/// this tick only.
///
/// Any `FnMut(f64)` closure is a registrant that runs in the update phase:
///
/// ```rust,ignore
/// let counter = shared(|dt: f64| log::trace!("tick after {dt} ms"));
/// frame_loop.register(counter.clone());
/// ```
pub trait Registrant {
    fn early_update(&mut self, dt: f64, ctx: &mut TickCtx) -> anyhow::Result<()> {
        let _ = (dt, ctx);
        Ok(())
    }

    fn update(&mut self, dt: f64, ctx: &mut TickCtx) -> anyhow::Result<()> {
        let _ = (dt, ctx);
        Ok(())
    }

    fn late_update(&mut self, dt: f64, ctx: &mut TickCtx) -> anyhow::Result<()> {
        let _ = (dt, ctx);
        Ok(())
    }
}

impl<F> Registrant for F
where
    F: FnMut(f64),
{
    fn update(&mut self, dt: f64, _ctx: &mut TickCtx) -> anyhow::Result<()> {
        self(dt);
        Ok(())
    }
}

/// Wraps a registrant for registration while keeping typed access.
///
/// The returned handle coerces to `SharedRegistrant` when passed to
/// `FrameLoop::register`.
pub fn shared<R: Registrant + 'static>(registrant: R) -> Rc<RefCell<R>> {
    Rc::new(RefCell::new(registrant))
}

/// Address of the shared cell; the identity used for dedup and removal.
pub(crate) fn identity<R: ?Sized>(registrant: &Rc<RefCell<R>>) -> usize {
    Rc::as_ptr(registrant).cast::<()>() as usize
}

/// Runs one phase callback on a registrant.
pub(crate) fn invoke(
    registrant: &mut dyn Registrant,
    phase: Phase,
    dt: f64,
    ctx: &mut TickCtx,
) -> anyhow::Result<()> {
    match phase {
        Phase::EarlyUpdate => registrant.early_update(dt, ctx),
        Phase::Update => registrant.update(dt, ctx),
        Phase::LateUpdate => registrant.late_update(dt, ctx),
    }
}
