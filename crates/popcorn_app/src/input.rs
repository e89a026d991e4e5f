/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Clear,
    /// 1-based index into the result list.
    Open(usize),
    Back,
    Rate(u8),
    Add,
    /// 1-based index into the watched list.
    Remove(usize),
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
type to search (3+ characters), empty line clears
:open N   show details for result N
:back     close details
:rate N   rate the open movie (1-10)
:add      add the open movie to your watched list
:rm N     remove watched movie N
:quit     exit";

pub fn parse_line(line: &str) -> Command {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    if line.is_empty() {
        return Command::Clear;
    }
    let Some(rest) = line.strip_prefix(':') else {
        // Search text is kept exactly as typed.
        return Command::Query(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("open" | "o", Some(n)) => index_arg(n).map_or_else(|| invalid(line), Command::Open),
        ("back" | "b", None) => Command::Back,
        ("rate" | "r", Some(n)) => n.parse().map_or_else(|_| invalid(line), Command::Rate),
        ("add" | "a", None) => Command::Add,
        ("rm", Some(n)) => index_arg(n).map_or_else(|| invalid(line), Command::Remove),
        ("help" | "h", None) => Command::Help,
        ("quit" | "q", None) => Command::Quit,
        _ => invalid(line),
    }
}

fn index_arg(raw: &str) -> Option<usize> {
    raw.parse().ok().filter(|n| *n > 0)
}

fn invalid(line: &str) -> Command {
    Command::Invalid(line.to_string())
}
