//! Interactive control commands.
//!
//! Commands arrive on a channel from whatever front end drives the run and
//! are only looked at between generations, so nothing ever interrupts a
//! generation in flight.

use crossbeam_channel::{Receiver, TryRecvError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Freeze progression. Sent again while paused, it resumes.
    Pause,
    Resume,
    /// Snapshot the current grid and keep going.
    Save,
    /// Snapshot the current grid, then finish the run early.
    Quit,
}

impl Command {
    /// Keyboard mapping: `p` pause, `r` resume, `s` save, `q` quit.
    /// Any other key is not a command.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'p' => Some(Command::Pause),
            'r' => Some(Command::Resume),
            's' => Some(Command::Save),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

pub struct ControlLoop {
    commands: Receiver<Command>,
    connected: bool,
}

impl ControlLoop {
    pub fn new(commands: Receiver<Command>) -> Self {
        Self {
            commands,
            connected: true,
        }
    }

    /// Next pending command, without blocking.
    pub fn poll(&mut self) -> Option<Command> {
        match self.commands.try_recv() {
            Ok(cmd) => Some(cmd),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.note_disconnect();
                None
            }
        }
    }

    /// Block until a command arrives. `None` once the front end is gone.
    pub fn wait(&mut self) -> Option<Command> {
        match self.commands.recv() {
            Ok(cmd) => Some(cmd),
            Err(_) => {
                self.note_disconnect();
                None
            }
        }
    }

    fn note_disconnect(&mut self) {
        if self.connected {
            log::warn!("control channel closed; no further commands will arrive");
            self.connected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::{Command, ControlLoop};

    #[test]
    fn key_mapping() {
        assert_eq!(Command::from_key('p'), Some(Command::Pause));
        assert_eq!(Command::from_key('R'), Some(Command::Resume));
        assert_eq!(Command::from_key('s'), Some(Command::Save));
        assert_eq!(Command::from_key('q'), Some(Command::Quit));
        assert_eq!(Command::from_key('k'), None);
        assert_eq!(Command::from_key(' '), None);
    }

    #[test]
    fn poll_is_fifo_and_non_blocking() {
        let (tx, rx) = unbounded();
        let mut control = ControlLoop::new(rx);
        assert_eq!(control.poll(), None);

        tx.send(Command::Save).unwrap();
        tx.send(Command::Quit).unwrap();
        assert_eq!(control.poll(), Some(Command::Save));
        assert_eq!(control.poll(), Some(Command::Quit));
        assert_eq!(control.poll(), None);
    }

    #[test]
    fn disconnected_channel_reads_as_no_command() {
        let (tx, rx) = unbounded::<Command>();
        drop(tx);
        let mut control = ControlLoop::new(rx);
        assert_eq!(control.poll(), None);
        assert_eq!(control.wait(), None);
    }
}
