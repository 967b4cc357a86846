use std::{
    io::{self, BufRead, Write},
    thread,
};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::UiEvent,
        orchestration::{dispatch_backend_command, resolve_intent, IntentOutcome},
        reducer::ViewState,
    },
    ui::{
        input::{parse_intent, HELP},
        render::render,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Quit,
}

pub struct StorefrontApp<W: Write> {
    state: ViewState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    out: W,
}

impl<W: Write> StorefrontApp<W> {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, out: W) -> Self {
        Self {
            state: ViewState::default(),
            cmd_tx,
            ui_rx,
            out,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Mounts, renders the ready view, and returns without reading input.
    pub fn run_once(&mut self) -> Result<()> {
        self.mount()?;
        while !self.state.is_ready() && !self.state.backend_failed {
            let event = self
                .ui_rx
                .recv()
                .context("backend worker exited before the storefront loaded")?;
            self.state.apply(event);
        }
        self.redraw()
    }

    /// Interactive loop over stdin lines and backend events until `quit` or EOF.
    pub fn run_interactive(&mut self) -> Result<()> {
        let input_rx = spawn_stdin_reader();
        let ui_rx = self.ui_rx.clone();
        self.mount()?;

        loop {
            select! {
                recv(ui_rx) -> event => match event {
                    Ok(event) => {
                        if self.state.apply(event) {
                            self.redraw()?;
                        }
                    }
                    Err(_) => break,
                },
                recv(input_rx) -> line => match line {
                    Ok(line) => {
                        if self.handle_line(&line)? == LineOutcome::Quit {
                            break;
                        }
                    }
                    Err(_) => break,
                },
            }
        }
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<LineOutcome> {
        let intent = match parse_intent(line) {
            Ok(Some(intent)) => intent,
            Ok(None) => return Ok(LineOutcome::Continue),
            Err(message) => {
                self.state.status = message;
                self.redraw()?;
                return Ok(LineOutcome::Continue);
            }
        };

        match resolve_intent(intent, &self.state) {
            IntentOutcome::Dispatch(cmd) => {
                self.state.status.clear();
                dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.status);
                if !self.state.status.is_empty() {
                    self.redraw()?;
                }
            }
            IntentOutcome::ShowHelp => {
                self.state.status = HELP.to_string();
                self.redraw()?;
            }
            IntentOutcome::Rejected(message) => {
                self.state.status = message;
                self.redraw()?;
            }
            IntentOutcome::Quit => return Ok(LineOutcome::Quit),
        }
        Ok(LineOutcome::Continue)
    }

    fn mount(&mut self) -> Result<()> {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Mount, &mut self.state.status);
        self.redraw()
    }

    fn redraw(&mut self) -> Result<()> {
        write!(self.out, "{}", render(&self.state)).context("failed to write view")?;
        self.out.flush().context("failed to flush view")
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (line_tx, line_rx) = bounded::<String>(64);
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
