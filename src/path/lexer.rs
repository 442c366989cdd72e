/// Tokenizer for SVG path description strings.
///
/// The input is cut into command chunks (a command letter plus the raw number
/// tokens that follow it). Numbers are split on whitespace and commas, before
/// a sign that does not belong to an exponent, and before a second decimal
/// point (`0.5.5` reads as `0.5 .5`).
const COMMAND_LETTERS: &str = "MmLlHhVvCcSsQqTtAaZz";

/// A command letter with the number tokens written after it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Chunk<'a> {
    pub letter: char,
    pub tokens: Vec<&'a str>,
}

/// State of the number token currently being read.
#[derive(Debug, Default)]
struct NumberState {
    start: Option<usize>,
    seen_dot: bool,
    seen_exp: bool,
    last: Option<char>,
}

impl NumberState {
    fn begin(&mut self, at: usize) {
        *self = Self {
            start: Some(at),
            ..Self::default()
        };
    }

    /// Ends the current token at byte `end` and appends it to the last chunk.
    fn flush<'a>(&mut self, d: &'a str, end: usize, chunks: &mut [Chunk<'a>]) {
        if let (Some(start), Some(chunk)) = (self.start.take(), chunks.last_mut()) {
            chunk.tokens.push(&d[start..end]);
        }
        *self = Self::default();
    }
}

/// Splits `d` into command chunks.
///
/// Text before the first command letter is ignored.
pub(crate) fn tokenize(d: &str) -> Vec<Chunk<'_>> {
    let mut chunks: Vec<Chunk<'_>> = Vec::new();
    let mut num = NumberState::default();

    for (i, ch) in d.char_indices() {
        if COMMAND_LETTERS.contains(ch) {
            num.flush(d, i, &mut chunks);
            chunks.push(Chunk {
                letter: ch,
                tokens: Vec::new(),
            });
            continue;
        }
        if ch.is_whitespace() || ch == ',' {
            num.flush(d, i, &mut chunks);
            continue;
        }
        if chunks.is_empty() {
            continue;
        }

        match ch {
            '-' | '+' => {
                let in_exponent = matches!(num.last, Some('e' | 'E'));
                if num.start.is_some() && !in_exponent {
                    num.flush(d, i, &mut chunks);
                }
                if num.start.is_none() {
                    num.begin(i);
                }
            }
            '.' => {
                if num.start.is_some() && (num.seen_dot || num.seen_exp) {
                    num.flush(d, i, &mut chunks);
                }
                if num.start.is_none() {
                    num.begin(i);
                }
                num.seen_dot = true;
            }
            'e' | 'E' => {
                if num.start.is_none() {
                    num.begin(i);
                }
                num.seen_exp = true;
            }
            _ => {
                if num.start.is_none() {
                    num.begin(i);
                }
            }
        }
        num.last = Some(ch);
    }
    num.flush(d, d.len(), &mut chunks);
    chunks
}

/// Re-splits the tokens of an arc chunk so run-together flags become
/// separate values.
///
/// Arc tuples are `rx ry rotation large-arc sweep x y`. The two flags are
/// single digits that may be written without separators, either together
/// (`11`) or glued to the following coordinate (`1110` = `1 1 10`). The
/// scanner tracks the tuple slot of each token and peels leading `0`/`1`
/// digits off tokens that land on a flag slot.
pub(crate) fn split_arc_flags<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    const ARITY: usize = 7;
    const LARGE_ARC: usize = 3;
    const SWEEP: usize = 4;

    let mut out = Vec::with_capacity(tokens.len() + 2);
    let mut slot = 0;
    for &token in tokens {
        let mut rest = token;
        while (slot == LARGE_ARC || slot == SWEEP)
            && rest.len() > 1
            && rest.starts_with(['0', '1'])
        {
            out.push(&rest[..1]);
            rest = &rest[1..];
            slot += 1;
        }
        out.push(rest);
        slot = (slot + 1) % ARITY;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(d: &str) -> Vec<(char, Vec<&str>)> {
        tokenize(d)
            .into_iter()
            .map(|c| (c.letter, c.tokens))
            .collect()
    }

    #[test]
    fn commas_tabs_and_newlines_separate() {
        assert_eq!(
            tokens("M0,0\tL10,\n10 z"),
            vec![('M', vec!["0", "0"]), ('L', vec!["10", "10"]), ('z', vec![])]
        );
    }

    #[test]
    fn minus_after_digit_starts_number() {
        assert_eq!(tokens("M1-2-3.5"), vec![('M', vec!["1", "-2", "-3.5"])]);
    }

    #[test]
    fn exponent_sign_stays_in_number() {
        assert_eq!(tokens("L1e-5-2E+3"), vec![('L', vec!["1e-5", "-2E+3"])]);
    }

    #[test]
    fn decimal_run_ons_split() {
        assert_eq!(tokens("l0.5.5.25"), vec![('l', vec!["0.5", ".5", ".25"])]);
        assert_eq!(tokens("l-.5.5"), vec![('l', vec!["-.5", ".5"])]);
    }

    #[test]
    fn leading_garbage_is_ignored() {
        assert_eq!(tokens("  12 M1 2"), vec![('M', vec!["1", "2"])]);
    }

    #[test]
    fn adjacent_commands_without_spaces() {
        assert_eq!(
            tokens("M0 0L5 5Z"),
            vec![('M', vec!["0", "0"]), ('L', vec!["5", "5"]), ('Z', vec![])]
        );
    }

    #[test]
    fn arc_flags_glued_to_coordinate() {
        let split = split_arc_flags(&["5", "5", "0", "1110", "10"]);
        assert_eq!(split, vec!["5", "5", "0", "1", "1", "10", "10"]);
    }

    #[test]
    fn arc_flags_glued_together() {
        let split = split_arc_flags(&["5", "5", "0", "01", "10", "10"]);
        assert_eq!(split, vec!["5", "5", "0", "0", "1", "10", "10"]);
    }

    #[test]
    fn sweep_flag_glued_to_coordinate() {
        let split = split_arc_flags(&["5", "5", "0", "1", "010", "10"]);
        assert_eq!(split, vec!["5", "5", "0", "1", "0", "10", "10"]);
    }

    #[test]
    fn separated_flags_untouched() {
        let input = ["4", "4", "30", "1", "0", "10.5", "-3"];
        assert_eq!(split_arc_flags(&input), input.to_vec());
    }

    #[test]
    fn flag_scan_restarts_for_repeated_tuples() {
        let split = split_arc_flags(&["1", "1", "0", "11", "2", "2", "1", "1", "0", "001", "2"]);
        assert_eq!(
            split,
            vec!["1", "1", "0", "1", "1", "2", "2", "1", "1", "0", "0", "0", "1", "2"]
        );
    }

    #[test]
    fn coordinates_outside_flag_slots_untouched() {
        let split = split_arc_flags(&["10", "10", "0", "0", "1", "100", "110"]);
        assert_eq!(split, vec!["10", "10", "0", "0", "1", "100", "110"]);
    }
}
