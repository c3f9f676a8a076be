//! Human confirmation for risky actions
//!
//! Any action the model flags with a `safety_decision` is held until the
//! operator answers. Empty input denies.

use std::io::{self, BufRead, Write};

use crate::tools::action::{ActionRequest, SafetyDecision};

/// Asks a human whether a flagged action may run
pub trait Confirmer: Send {
    /// Return `true` to let the action proceed
    fn confirm(&mut self, decision: &SafetyDecision) -> bool;
}

/// Verdict of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The action carried no safety decision
    NotRequired,
    /// The operator accepted; the outcome carries an acknowledgement
    Acknowledged,
    /// The operator refused; the turn and the session end here
    Denied,
}

pub struct SafetyGate<'a> {
    confirmer: &'a mut dyn Confirmer,
}

impl<'a> SafetyGate<'a> {
    pub fn new(confirmer: &'a mut dyn Confirmer) -> Self {
        Self { confirmer }
    }

    pub fn review(&mut self, request: &ActionRequest) -> GateDecision {
        let Some(decision) = request.safety_decision.as_ref() else {
            return GateDecision::NotRequired;
        };

        log::info!(
            "Confirmation required for {}: {}",
            request.name,
            decision.explanation
        );

        if self.confirmer.confirm(decision) {
            GateDecision::Acknowledged
        } else {
            log::warn!("Operator denied {}", request.name);
            GateDecision::Denied
        }
    }
}

/// Prompts on a terminal, `[y/N]`
pub struct TerminalConfirmer<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirmer<io::BufReader<io::Stdin>, io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, decision: &SafetyDecision) -> io::Result<bool> {
        writeln!(self.output, "\n⚠ Safety check: confirmation required")?;
        if !decision.explanation.is_empty() {
            writeln!(self.output, "{}", decision.explanation)?;
        }

        loop {
            write!(self.output, "Continue? [y/N]: ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                // EOF
                return Ok(false);
            }

            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }
}

impl<R, W> Confirmer for TerminalConfirmer<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&mut self, decision: &SafetyDecision) -> bool {
        match self.ask(decision) {
            Ok(allowed) => allowed,
            Err(e) => {
                log::warn!("Could not read confirmation, denying: {}", e);
                false
            }
        }
    }
}
