use std::io;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

// Raw-mode + alternate-screen guard. The single release point is handing the
// terminal to the player; Drop covers early exits.
pub(super) struct ScreenGuard {
    held: bool,
}

impl ScreenGuard {
    pub(super) fn acquire() -> Result<Self> {
        enable_raw_mode().context("failed to put the terminal into raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("failed to open the alternate screen")?;
        Ok(Self { held: true })
    }

    // Runs `run` with the terminal handed back to the shell, then takes the
    // screen again. The closure outcome is returned untouched.
    pub(super) fn while_released<T>(&mut self, run: impl FnOnce() -> T) -> Result<T> {
        self.release()?;
        let outcome = run();
        self.reacquire()?;
        Ok(outcome)
    }

    pub(super) fn release(&mut self) -> Result<()> {
        if !self.held {
            return Ok(());
        }
        self.held = false;
        disable_raw_mode().context("failed to restore the terminal mode")?;
        execute!(io::stdout(), LeaveAlternateScreen)
            .context("failed to close the alternate screen")?;
        Ok(())
    }

    fn reacquire(&mut self) -> Result<()> {
        if self.held {
            return Ok(());
        }
        execute!(io::stdout(), EnterAlternateScreen)
            .context("failed to reopen the alternate screen")?;
        enable_raw_mode().context("failed to re-enter raw mode")?;
        self.held = true;
        Ok(())
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if self.held {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}
