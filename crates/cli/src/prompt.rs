use std::io::{self, BufRead, Write};
use std::path::Path;

/// Writing this many links or more asks for confirmation first
pub const CONFIRM_THRESHOLD: usize = 1000;

pub fn needs_confirmation(total: usize, skip_prompt: bool) -> bool {
    total >= CONFIRM_THRESHOLD && !skip_prompt
}

/// Asks until the answer is yes or no. An empty answer means yes, closed
/// input means no.
pub fn confirm_write(
    input: &mut impl BufRead,
    output: &mut impl Write,
    total: usize,
    kind: &str,
    path: &Path,
) -> io::Result<bool> {
    loop {
        write!(output, "Write all {} links as {} to '{}' (Y/n): ", total, kind, path.display())?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_case::test_case;

    fn ask(answers: &str) -> (bool, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let confirmed = confirm_write(&mut input, &mut output, 1234, "json", Path::new("images.json")).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test_case("\n", true ; "empty means yes")]
    #[test_case("y\n", true ; "y")]
    #[test_case("YES\n", true ; "yes uppercase")]
    #[test_case("n\n", false ; "n")]
    #[test_case("No\n", false ; "no mixed case")]
    #[test_case("", false ; "closed input")]
    fn test_answers(answers: &str, expected: bool) {
        assert_eq!(ask(answers).0, expected);
    }

    #[test]
    fn test_reprompts_on_unknown_answer() {
        let (confirmed, prompts) = ask("maybe\nsure\nn\n");
        assert!(!confirmed);
        assert_eq!(prompts.matches("(Y/n)").count(), 3);
    }

    #[test]
    fn test_prompt_text() {
        let (_, prompt) = ask("y\n");
        assert_eq!(prompt, "Write all 1234 links as json to 'images.json' (Y/n): ");
    }

    #[test_case(999, false, false ; "below threshold")]
    #[test_case(1000, false, true ; "at threshold")]
    #[test_case(5000, true, false ; "skip prompt")]
    fn test_needs_confirmation(total: usize, skip: bool, expected: bool) {
        assert_eq!(needs_confirmation(total, skip), expected);
    }
}
