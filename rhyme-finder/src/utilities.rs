use std::io::{self, Write};

pub fn input(prompt: &str) -> io::Result<String> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

/// Parses the argument of `max`: a positive number, or one of the words that clear the cap.
pub fn parse_max_results(mut str: String) -> Option<Option<usize>> {
    str.make_ascii_lowercase();
    match str.trim() {
        "none" | "off" | "default" | "auto" | "" => Some(None),
        number => number.parse::<usize>().ok().filter(|&max| max > 0).map(Some),
    }
}

/// The known command closest to `unknown`, if any is close enough to be a typo.
pub fn closest_command<'a>(unknown: &str, commands: &[&'a str]) -> Option<&'a str> {
    commands
        .iter()
        .map(|command| (*command, strsim::jaro(command, &unknown.to_lowercase())))
        .filter(|(_, similarity)| *similarity > 0.8)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(command, _)| command)
}
