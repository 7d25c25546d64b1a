//! Commands typed into an interactive browse session.

use shared::domain::{ProductId, SortSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Category(Option<String>),
    Sort(Option<SortSpec>),
    Page(u32),
    Open(ProductId),
    Refresh,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  search <text>          filter the loaded page by name (debounced)
  category [name]        filter by category; no name clears the filter
  sort [field[:dir]]     sort by id|name|brand|category|price, asc|desc; no field clears
  page <n>               load page n
  open <id>              show the product with that S.No
  refresh                reload the current page
  show                   print the current rows
  help                   this text
  quit                   leave
";

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            // Search text is kept verbatim; it may legitimately be empty.
            "search" | "s" => Ok(Self::Search(rest.to_string())),
            "category" | "c" => Ok(Self::Category(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "sort" => {
                if rest.is_empty() {
                    return Ok(Self::Sort(None));
                }
                SortSpec::parse(rest)
                    .map(|spec| Self::Sort(Some(spec)))
                    .ok_or_else(|| format!("unknown sort '{rest}'"))
            }
            "page" | "p" => rest
                .parse::<u32>()
                .ok()
                .filter(|page| *page > 0)
                .map(Self::Page)
                .ok_or_else(|| format!("invalid page '{rest}'")),
            "open" | "o" => rest
                .parse::<u64>()
                .map(|id| Self::Open(ProductId(id)))
                .map_err(|_| format!("invalid product id '{rest}'")),
            "refresh" | "r" => Ok(Self::Refresh),
            "show" | "ls" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}'; type `help`")),
        }
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
