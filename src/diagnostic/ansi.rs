use crate::operation::Operation;
use crate::term::Term;
use super::ErrorMap;

pub struct AnsiRenderer {
    pub use_color: bool,
}

impl AnsiRenderer {
    fn bold(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold_red(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1;31m{s}\x1b[0m") } else { s.to_string() }
    }

    fn cyan(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[36m{s}\x1b[0m") } else { s.to_string() }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[2m{s}\x1b[0m") } else { s.to_string() }
    }

    pub fn render(&self, op: &Operation, args: &[Term], errors: &ErrorMap) -> String {
        let mut out = String::new();

        // "error: call to binary:part/3 failed"
        out.push_str(&format!(
            "{}: {}\n",
            self.bold_red("error"),
            self.bold(&format!("call to {op} failed"))
        ));

        if errors.is_empty() {
            out.push_str(&format!("  {} {}\n", self.dim("="), "no argument-specific explanation available"));
            return out;
        }

        // Gutter width based on the widest position number
        let gutter = args.len().max(1).to_string().len();
        let pipe = self.cyan("|");
        for (i, arg) in args.iter().enumerate() {
            let position = i + 1;
            let num = self.cyan(&format!("{position:>gutter$}"));
            match errors.get(position) {
                Some(message) => out.push_str(&format!(
                    "{num} {pipe} {arg}\n{pad} {pipe} {}\n",
                    self.bold_red(&format!("^ {message}")),
                    pad = " ".repeat(gutter),
                )),
                None => out.push_str(&format!("{num} {pipe} {}\n", self.dim(&arg.to_string()))),
            }
        }

        out
    }
}
