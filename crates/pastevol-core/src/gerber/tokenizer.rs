//! Command tokenizer for RS-274X text.
//!
//! Commands are terminated by `*`; extended (parameter) commands are wrapped
//! in `%` delimiters. The tokenizer is a lazy iterator over the input —
//! restarting means tokenizing again from the top.

use crate::error::GerberError;

/// One tokenized command with its `*` terminator and any `%` delimiters
/// stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command body without terminator, delimiters, or whitespace.
    pub text: String,
    /// Whether the command appeared inside a `%` parameter block.
    pub extended: bool,
}

/// Lazy command iterator over Gerber text.
///
/// Whitespace, including CR and LF in any combination, is discarded between
/// tokens, so line-ending style never affects the command stream. `G04`
/// comment commands are skipped here.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    chars: std::str::Chars<'a>,
    in_extended: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over the full file contents.
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars(),
            in_extended: false,
            finished: false,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Command, GerberError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut buffer = String::new();
        for ch in self.chars.by_ref() {
            match ch {
                '%' => {
                    if buffer.is_empty() {
                        self.in_extended = !self.in_extended;
                    } else {
                        self.finished = true;
                        return Some(Err(GerberError::MalformedCommand(format!(
                            "`%` inside unterminated command `{buffer}`"
                        ))));
                    }
                }
                '*' => {
                    if buffer.is_empty() || is_comment(&buffer) {
                        buffer.clear();
                        continue;
                    }
                    return Some(Ok(Command {
                        text: std::mem::take(&mut buffer),
                        extended: self.in_extended,
                    }));
                }
                c if c.is_whitespace() => {}
                c => buffer.push(c),
            }
        }

        self.finished = true;
        if !buffer.is_empty() {
            return Some(Err(GerberError::MalformedCommand(format!(
                "unterminated command `{buffer}` at end of file"
            ))));
        }
        if self.in_extended {
            return Some(Err(GerberError::MalformedCommand(
                "unterminated `%` parameter block at end of file".to_string(),
            )));
        }
        None
    }
}

fn is_comment(text: &str) -> bool {
    text.starts_with("G04")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_ok(input: &str) -> Vec<Command> {
        let mut commands = Vec::new();
        for item in Tokenizer::new(input) {
            assert!(item.is_ok(), "unexpected tokenizer error: {item:?}");
            if let Ok(command) = item {
                commands.push(command);
            }
        }
        commands
    }

    #[test]
    fn ut_tok_001_splits_on_star_terminator() {
        let commands = collect_ok("D10*X100Y100D03*M02*");
        let texts: Vec<&str> = commands.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["D10", "X100Y100D03", "M02"]);
    }

    #[test]
    fn ut_tok_002_extended_commands_are_flagged() {
        let commands = collect_ok("%MOMM*%\nD10*");
        let flags: Vec<bool> = commands.iter().map(|c| c.extended).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn ut_tok_003_crlf_and_lf_tokenize_identically() {
        let lf = collect_ok("%FSLAX23Y23*%\n%MOMM*%\nD10*\nM02*\n");
        let crlf = collect_ok("%FSLAX23Y23*%\r\n%MOMM*%\r\nD10*\r\nM02*\r\n");
        assert_eq!(lf, crlf);
    }

    #[test]
    fn ut_tok_004_commands_may_span_lines() {
        let commands = collect_ok("X100\nY200D03*");
        let texts: Vec<&str> = commands.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["X100Y200D03"]);
    }

    #[test]
    fn ut_tok_005_comments_are_skipped() {
        let commands = collect_ok("G04 paste layer generated by CAD*D10*");
        let texts: Vec<&str> = commands.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["D10"]);
    }

    #[test]
    fn ut_tok_006_multiple_commands_inside_one_block() {
        let commands = collect_ok("%FSLAX23Y23*MOMM*%");
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| c.extended));
    }

    #[test]
    fn bc_tok_001_unterminated_command_is_fatal() {
        let last = Tokenizer::new("D10*X100Y100D03").last();
        assert!(
            matches!(last, Some(Err(GerberError::MalformedCommand(_)))),
            "expected MalformedCommand, got {last:?}"
        );
    }

    #[test]
    fn bc_tok_002_unclosed_parameter_block_is_fatal() {
        let last = Tokenizer::new("%MOMM*").last();
        assert!(
            matches!(last, Some(Err(GerberError::MalformedCommand(_)))),
            "expected MalformedCommand, got {last:?}"
        );
    }

    #[test]
    fn bc_tok_003_empty_input_yields_nothing() {
        assert!(Tokenizer::new("").next().is_none());
    }

    #[test]
    fn bc_tok_004_iterator_fuses_after_error() {
        let mut tokenizer = Tokenizer::new("D10");
        assert!(matches!(tokenizer.next(), Some(Err(_))));
        assert!(tokenizer.next().is_none());
    }
}
