use super::registrant::SharedRegistrant;

/// Per-tick context passed to every phase callback.
///
/// Loop commands are buffered and applied after the tick's last phase, so a
/// callback can register, unregister or stop without disturbing the
/// iteration that is in progress.
pub struct TickCtx {
    frame: i64,
    delta: f64,
    jitter: f64,
    dropped_frame: bool,
    commands: Vec<Command>,
}

pub(crate) enum Command {
    Register(SharedRegistrant),
    /// Holds the handle so its address cannot be reused before removal.
    Unregister(SharedRegistrant),
    Stop,
}

impl TickCtx {
    pub(crate) fn new(frame: i64, delta: f64, jitter: f64, dropped_frame: bool) -> Self {
        Self {
            frame,
            delta,
            jitter,
            dropped_frame,
            commands: Vec::new(),
        }
    }

    /// Frame number of this tick.
    pub fn frame(&self) -> i64 {
        self.frame
    }

    /// Milliseconds since the previous tick.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// True when two or more nominal intervals passed since the previous tick.
    pub fn dropped_frame(&self) -> bool {
        self.dropped_frame
    }

    /// Registers `registrant` once this tick completes.
    pub fn register(&mut self, registrant: SharedRegistrant) {
        self.commands.push(Command::Register(registrant));
    }

    /// Unregisters `registrant` once this tick completes. Later phases of the
    /// current tick still reach it.
    pub fn unregister(&mut self, registrant: SharedRegistrant) {
        self.commands.push(Command::Unregister(registrant));
    }

    /// Stops the loop once this tick completes.
    pub fn stop(&mut self) {
        self.commands.push(Command::Stop);
    }

    pub(crate) fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}
