//! Table-driven dispatch of unsolicited event lines.
//!
//! Each module dialect declares a static tree of prefix tables. A top-level
//! entry either terminates in an event id or points at a nested sub-table
//! whose entries match the next token; `%SOCKETEV:1,...` first matches the
//! `%SOCKETEV` parent, then `1` in its sub-table. Delimiters are declared
//! per entry because the dialects are not uniform about them (`:` after the
//! event name, `,` after a numeric sub-code, sometimes nothing at all).

/// One entry in an event table.
pub struct EventEntry<E: 'static> {
    pub prefix: &'static str,
    /// Characters accepted (and consumed) right after `prefix`. End of line
    /// always terminates; an empty set means the next token follows glued.
    pub delimiters: &'static [char],
    pub kind: EventKind<E>,
}

/// Leaf entries yield an event id, parent entries continue matching in a
/// nested sub-table.
#[derive(Clone, Copy)]
pub enum EventKind<E: 'static> {
    Leaf(E),
    Parent(&'static [EventEntry<E>]),
}

impl<E> EventEntry<E> {
    pub const fn leaf(prefix: &'static str, delimiters: &'static [char], event: E) -> Self {
        Self {
            prefix,
            delimiters,
            kind: EventKind::Leaf(event),
        }
    }

    pub const fn parent(
        prefix: &'static str,
        delimiters: &'static [char],
        table: &'static [EventEntry<E>],
    ) -> Self {
        Self {
            prefix,
            delimiters,
            kind: EventKind::Parent(table),
        }
    }
}

/// Matches `line` against `table`, longest prefix first.
///
/// Returns the leaf event id and the cursor advanced past the matched
/// tokens and their delimiters (leading spaces skipped), i.e. the start of
/// the event's arguments. `None` means the line is not of interest at some
/// level of the tree; callers drop it.
pub fn match_event<'a, E: Copy>(
    line: &'a str,
    table: &'static [EventEntry<E>],
) -> Option<(E, &'a str)> {
    let mut best: Option<(&'static EventEntry<E>, &'a str)> = None;
    for entry in table {
        let Some(rest) = line.strip_prefix(entry.prefix) else {
            continue;
        };
        let rest = match rest.chars().next() {
            None => rest,
            Some(c) if entry.delimiters.contains(&c) => &rest[c.len_utf8()..],
            Some(_) if entry.delimiters.is_empty() => rest,
            Some(_) => continue,
        };
        if best
            .as_ref()
            .map_or(true, |(b, _)| entry.prefix.len() > b.prefix.len())
        {
            best = Some((entry, rest));
        }
    }
    let (entry, rest) = best?;
    let rest = rest.trim_start_matches(' ');
    match entry.kind {
        EventKind::Leaf(event) => Some((event, rest)),
        EventKind::Parent(sub) => match_event(rest, sub),
    }
}
