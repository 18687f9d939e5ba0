//! Line-based front end for the study sessions.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;
use study_core::{
    ChoicePhase, ChoiceSession, DrillSession, Feedback, FlipSession, MarkOutcome, StudyError,
    StudySession,
};

const FLIP_HELP: &str = "[f]lip  [h]int  [y] knew it  [n] missed  [s]huffle  [r]eset  [q]uit";
const DRILL_HELP: &str = "[f]lip  [h]int  [y] knew it  [n] missed  [s]huffle  [r]estart  [q]uit";

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Next trimmed input line, `None` at end of input.
    fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{text}> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    pub fn run_flip(&mut self, session: &mut FlipSession) -> anyhow::Result<()> {
        writeln!(self.output, "{FLIP_HELP}")?;
        loop {
            let view = session.view();
            let difficulty = view.difficulty.unwrap_or(view.set_difficulty);
            writeln!(
                self.output,
                "\n{} [{}/{}] {}% ({}){}",
                view.set_name,
                view.index + 1,
                view.total,
                view.progress,
                difficulty.as_str(),
                if view.shuffled { " shuffled" } else { "" }
            )?;
            if view.complete {
                writeln!(self.output, "Set complete! All {} cards learned.", view.total)?;
            } else if view.flipped {
                writeln!(self.output, "A: {}", view.answer)?;
            } else {
                writeln!(self.output, "Q: {}", view.question)?;
            }

            let Some(command) = self.prompt("")? else {
                break;
            };
            match command.as_str() {
                "f" => {
                    session.flip();
                }
                "h" => {
                    let hint = session.request_hint();
                    writeln!(self.output, "Hint: {}", hint.text)?;
                }
                "y" | "n" => match session.mark(command == "y") {
                    Ok(MarkOutcome::Wrapped) => {
                        writeln!(self.output, "Back to the first card.")?;
                    }
                    Ok(MarkOutcome::Completed) => {
                        writeln!(self.output, "Every card learned.")?;
                    }
                    Ok(MarkOutcome::Advanced { .. }) => {}
                    Err(err) => writeln!(self.output, "{err}")?,
                },
                "s" => {
                    let on = session.toggle_shuffle();
                    writeln!(self.output, "Shuffle {}.", if on { "on" } else { "off" })?;
                }
                "r" => {
                    session.reset_progress();
                    writeln!(self.output, "Progress reset.")?;
                }
                "q" => break,
                _ => writeln!(self.output, "{FLIP_HELP}")?,
            }
        }
        self.summary(session)
    }

    pub fn run_choice(
        &mut self,
        session: &mut ChoiceSession,
        advance_delay: Duration,
    ) -> anyhow::Result<()> {
        if let Err(err) = session.load_question() {
            return self.halted(err);
        }

        loop {
            match session.phase() {
                ChoicePhase::Loading => {
                    if let Err(err) = session.load_question() {
                        return self.halted(err);
                    }
                }
                ChoicePhase::Answering => {
                    if !self.ask(session)? {
                        break;
                    }
                }
                ChoicePhase::Answered => {
                    if advance_delay.is_zero() {
                        if self.prompt("Enter for next ")?.is_none() {
                            break;
                        }
                    } else {
                        thread::sleep(advance_delay);
                    }
                    if let Err(err) = session.next() {
                        return self.halted(err);
                    }
                }
                ChoicePhase::Completed => {
                    let stats = session.stats();
                    writeln!(
                        self.output,
                        "\nAll {} cards mastered. Correct: {}  Wrong: {}  Accuracy: {:.0}%",
                        stats.total, stats.correct, stats.wrong, stats.accuracy
                    )?;
                    match self.prompt("[r]estart [q]uit ")?.as_deref() {
                        Some("r") => {
                            if let Err(err) = session.restart() {
                                return self.halted(err);
                            }
                        }
                        _ => break,
                    }
                }
                ChoicePhase::Halted => break,
            }
        }
        self.summary(session)
    }

    /// Show the current question and take one answer. `false` means quit.
    fn ask(&mut self, session: &mut ChoiceSession) -> anyhow::Result<bool> {
        let view = session.view();
        writeln!(
            self.output,
            "\n{} {}% ({} mastered, {} left)",
            view.set_name, view.progress, view.mastered, view.remaining
        )?;
        writeln!(self.output, "Q: {}", view.question.unwrap_or_default())?;
        for (i, option) in view.options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, option)?;
        }

        let Some(command) = self.prompt("")? else {
            return Ok(false);
        };
        if command == "q" {
            return Ok(false);
        }
        let picked = command
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| view.options.get(i));
        let Some(option) = picked else {
            writeln!(self.output, "Pick 1-{} or q.", view.options.len())?;
            return Ok(true);
        };

        let message = match session.submit(option)? {
            Feedback::Wrong => "Wrong, try again.",
            Feedback::Mastered => "Correct!",
            Feedback::WillRepeat => "Correct. This one will come back.",
            Feedback::None => "",
        };
        writeln!(self.output, "{message}")?;
        Ok(true)
    }

    fn halted(&mut self, err: StudyError) -> anyhow::Result<()> {
        match err {
            StudyError::InsufficientDistractors { needed, available } => {
                tracing::warn!(needed, available, "not enough distinct answers");
                writeln!(
                    self.output,
                    "Not enough distinct answers for multiple choice: need {needed} wrong options, found {available}. Add more cards to this set."
                )?;
                Ok(())
            }
            other => Err(other.into()),
        }
    }

    pub fn run_drill(&mut self, session: &mut DrillSession) -> anyhow::Result<()> {
        writeln!(self.output, "{DRILL_HELP}")?;
        loop {
            let view = session.view();
            writeln!(
                self.output,
                "\n{} {}% ({} cleared, {} left)",
                view.set_name, view.progress, view.cleared, view.remaining
            )?;
            if view.complete {
                writeln!(self.output, "All cards cleared.")?;
            } else if view.flipped {
                writeln!(self.output, "A: {}", view.answer.unwrap_or_default())?;
            } else {
                writeln!(self.output, "Q: {}", view.question.unwrap_or_default())?;
            }

            let Some(command) = self.prompt("")? else {
                break;
            };
            match command.as_str() {
                "f" => {
                    session.flip();
                }
                "h" => match session.request_hint() {
                    Some(hint) => writeln!(self.output, "Hint: {}", hint.text)?,
                    None => writeln!(self.output, "No card to hint.")?,
                },
                "y" | "n" => {
                    if let Err(err) = session.mark(command == "y") {
                        writeln!(self.output, "{err}")?;
                    }
                }
                "s" => session.shuffle(),
                "r" => session.reset(),
                "q" => break,
                _ => writeln!(self.output, "{DRILL_HELP}")?,
            }
        }
        self.summary(session)
    }

    fn summary(&mut self, session: &dyn StudySession) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "{}: {}% of {} cards{}",
            session.set_name(),
            session.progress(),
            session.total(),
            if session.is_complete() { ", complete" } else { "" }
        )?;
        Ok(())
    }
}
