//! Route template directives.
//!
//! Templates are plain text with a small, closed set of `{{...}}` directives:
//!
//! | Directive      | Meaning                                              |
//! |----------------|------------------------------------------------------|
//! | `{{gateway}}`  | gateway address, or the deferred placeholder         |
//! | `{{range}}`    | start of a block rendered once per address range     |
//! | `{{end}}`      | end of the range block                               |
//! | `{{network}}`  | base address of the current range (`1.0.1.0`)        |
//! | `{{prefix}}`   | prefix length of the current range (`24`)            |
//! | `{{cidr}}`     | CIDR notation of the current range (`1.0.1.0/24`)    |
//! | `{{netmask}}`  | dotted netmask of the current range (`255.255.255.0`)|
//!
//! Text between directives is copied verbatim, newlines included, so a
//! one-line-per-range template reads `{{range}}route add {{cidr}}\n{{end}}`.

use ipnet::Ipv4Net;
use std::fmt::Write;
use thiserror::Error;

use crate::generator::Gateway;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("line {line}: unknown directive '{name}'")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: unclosed directive")]
    UnclosedDirective { line: usize },

    #[error("line {line}: nested {{{{range}}}} blocks are not supported")]
    NestedRange { line: usize },

    #[error("line {line}: {{{{range}}}} without matching {{{{end}}}}")]
    UnterminatedRange { line: usize },

    #[error("line {line}: {{{{end}}}} without matching {{{{range}}}}")]
    UnexpectedEnd { line: usize },

    #[error("line {line}: '{name}' is only valid inside a {{{{range}}}} block")]
    FieldOutsideRange { line: usize, name: String },
}

/// Per-range value available inside a range block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Network,
    Prefix,
    Cidr,
    Netmask,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "network" => Some(Field::Network),
            "prefix" => Some(Field::Prefix),
            "cidr" => Some(Field::Cidr),
            "netmask" => Some(Field::Netmask),
            _ => None,
        }
    }

    fn write(self, out: &mut String, net: &Ipv4Net) {
        // Writing into a String cannot fail
        let _ = match self {
            Field::Network => write!(out, "{}", net.addr()),
            Field::Prefix => write!(out, "{}", net.prefix_len()),
            Field::Cidr => write!(out, "{}/{}", net.addr(), net.prefix_len()),
            Field::Netmask => write!(out, "{}", net.netmask()),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Gateway,
    Field(Field),
    Range(Vec<Segment>),
}

/// A parsed template, ready to render against any number of snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source into segments.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut top: Vec<Segment> = Vec::new();
        // Body of the currently open range block, with the line it started on
        let mut open_range: Option<(usize, Vec<Segment>)> = None;
        let mut rest = source;
        let mut line = 1;

        while let Some(start) = rest.find(OPEN) {
            let (text, after_open) = rest.split_at(start);
            let after_open = &after_open[OPEN.len()..];
            line += text.matches('\n').count();

            let in_range = open_range.is_some();
            let target = match open_range.as_mut() {
                Some((_, body)) => body,
                None => &mut top,
            };
            if !text.is_empty() {
                target.push(Segment::Text(text.to_string()));
            }

            let Some(end) = after_open.find(CLOSE) else {
                return Err(TemplateError::UnclosedDirective { line });
            };
            let raw = &after_open[..end];
            let name = raw.trim();

            match name {
                "gateway" => target.push(Segment::Gateway),
                "range" => {
                    if in_range {
                        return Err(TemplateError::NestedRange { line });
                    }
                    open_range = Some((line, Vec::new()));
                }
                "end" => match open_range.take() {
                    Some((_, body)) => top.push(Segment::Range(body)),
                    None => return Err(TemplateError::UnexpectedEnd { line }),
                },
                other => match Field::from_name(other) {
                    Some(field) if in_range => target.push(Segment::Field(field)),
                    Some(_) => {
                        return Err(TemplateError::FieldOutsideRange {
                            line,
                            name: other.to_string(),
                        })
                    }
                    None => {
                        return Err(TemplateError::UnknownDirective {
                            line,
                            name: other.to_string(),
                        })
                    }
                },
            }

            line += raw.matches('\n').count();
            rest = &after_open[end + CLOSE.len()..];
        }

        if let Some((started, _)) = open_range {
            return Err(TemplateError::UnterminatedRange { line: started });
        }
        if !rest.is_empty() {
            top.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments: top })
    }

    /// Render the template over `ranges` in their given order.
    pub fn render(&self, ranges: &[Ipv4Net], gateway: &Gateway) -> Vec<u8> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Gateway => out.push_str(gateway.as_str()),
                Segment::Range(body) => {
                    for net in ranges {
                        render_range_body(&mut out, body, net, gateway);
                    }
                }
                // Rejected by the parser
                Segment::Field(_) => {}
            }
        }
        out.into_bytes()
    }

    /// Whether the template iterates over the snapshot at all.
    pub fn uses_ranges(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Range(_)))
    }
}

fn render_range_body(out: &mut String, body: &[Segment], net: &Ipv4Net, gateway: &Gateway) {
    for segment in body {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Gateway => out.push_str(gateway.as_str()),
            Segment::Field(field) => field.write(out, net),
            Segment::Range(_) => {}
        }
    }
}
