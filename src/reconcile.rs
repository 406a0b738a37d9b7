//! Narrows the CDDB candidates of a disc down to one preferred entry.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::domain::metadata::{DiscMetadataRecord, MetadataEntry};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("input closed before a result was selected")]
    InputClosed,

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// The operator's answer was not a valid choice; ask again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPrompt;

/// Maps an operator answer in `[1, count]` to a 0-based entry index.
pub fn resolve_selection(input: &str, count: usize) -> Result<usize, RetryPrompt> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(RetryPrompt),
    }
}

/// Prints every entry with its track listing, numbered from 1.
pub fn display_entries<W: Write>(entries: &[MetadataEntry], out: &mut W) -> io::Result<()> {
    for (num, entry) in entries.iter().enumerate() {
        writeln!(out, "\n===== Result {:02} =====\n", num + 1)?;
        writeln!(out, "category: {}", entry.candidate.category)?;
        writeln!(out, "disc id:  {}", entry.candidate.disc_id)?;
        writeln!(out, "title:    {}\n", entry.candidate.title)?;
        for (track, title) in entry.listing.titles.iter().enumerate() {
            writeln!(out, "Track {:02}: {title}", track + 1)?;
        }
    }
    if !entries.is_empty() {
        writeln!(out, "\n=====================\n")?;
    }
    Ok(())
}

/// Marks the preferred entry of `record`.
///
/// No entries leaves the record without a preferred entry, a single entry is
/// chosen without asking, and several entries are shown to the operator who is
/// prompted until they give a valid number.
pub fn reconcile<R: BufRead, W: Write>(
    record: &mut DiscMetadataRecord,
    input: &mut R,
    out: &mut W,
) -> Result<(), ReconcileError> {
    display_entries(&record.entries, out)?;

    record.preferred = match record.entries.len() {
        0 => {
            writeln!(out, "No CDDB results found for disc {}", record.fingerprint.id)?;
            None
        }
        1 => Some(0),
        count => Some(prompt_selection(count, input, out)?),
    };

    if let Some(index) = record.preferred {
        writeln!(out, "Selected result: {}\n", record.entries[index].candidate.title)?;
    }
    Ok(())
}

fn prompt_selection<R: BufRead, W: Write>(
    count: usize,
    input: &mut R,
    out: &mut W,
) -> Result<usize, ReconcileError> {
    loop {
        write!(out, "Select a preferred result [1-{count}]: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ReconcileError::InputClosed);
        }
        match resolve_selection(&line, count) {
            Ok(index) => return Ok(index),
            Err(RetryPrompt) => writeln!(out, "Invalid selection")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::domain::metadata::{ReconciledMetadata, fixtures};

    fn record_with(titles: &[&str]) -> DiscMetadataRecord {
        DiscMetadataRecord::new(
            fixtures::fingerprint(2),
            titles.iter().map(|t| fixtures::entry(t, 2)).collect(),
        )
    }

    #[test]
    fn selection_accepts_numbers_in_range() {
        assert_eq!(resolve_selection("1", 3), Ok(0));
        assert_eq!(resolve_selection(" 3\n", 3), Ok(2));
    }

    #[test]
    fn selection_rejects_everything_else() {
        for input in ["0", "4", "-1", "", "two", "1.5", "99999999999999999999999"] {
            assert_eq!(resolve_selection(input, 3), Err(RetryPrompt), "{input:?}");
        }
        assert_eq!(resolve_selection("1", 0), Err(RetryPrompt));
    }

    #[test]
    fn zero_candidates_leave_no_preferred_entry() {
        let mut record = record_with(&[]);
        let mut out = Vec::new();

        reconcile(&mut record, &mut Cursor::new(""), &mut out).unwrap();

        assert_eq!(record.preferred, None);
        assert_eq!(record.reconciled(), ReconciledMetadata::NoMatch);
        assert!(String::from_utf8(out).unwrap().contains("No CDDB results"));
    }

    #[test]
    fn single_candidate_is_chosen_without_prompting() {
        let mut record = record_with(&["Sample Album"]);
        let mut out = Vec::new();

        reconcile(&mut record, &mut Cursor::new(""), &mut out).unwrap();

        assert_eq!(record.preferred, Some(0));
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("Select a preferred result"));
        assert!(out.contains("Selected result: Sample Album"));
    }

    #[test]
    fn multiple_candidates_reprompt_until_valid() {
        let mut record = record_with(&["First", "Second", "Third"]);
        let mut out = Vec::new();

        reconcile(&mut record, &mut Cursor::new("zero\n0\n4\n2\n"), &mut out).unwrap();

        assert_eq!(record.preferred, Some(1));
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Select a preferred result [1-3]: ").count(), 4);
        assert_eq!(out.matches("Invalid selection").count(), 3);
        assert!(out.contains("===== Result 03 ====="));
        assert!(out.contains("Track 02: Song 2"));
    }

    #[test]
    fn closed_input_aborts_selection() {
        let mut record = record_with(&["First", "Second"]);

        let err = reconcile(&mut record, &mut Cursor::new("7\n"), &mut Vec::new()).unwrap_err();

        assert!(matches!(err, ReconcileError::InputClosed));
        assert_eq!(record.preferred, None);
    }
}
