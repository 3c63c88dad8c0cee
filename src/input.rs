//! Delimited input readers.
//!
//! Three record streams feed the pipeline from files:
//!
//! - expansion pairs `(original_docno, related_docno, score)`, grouped by
//!   original docno into precomputed expansion sets;
//! - premade pseudo-queries `(docno, term, weight)`, one sparse vector per
//!   docno;
//! - trec-style run files (`query Q0 docno rank score tag`), grouped into
//!   ranked hit lists per query.
//!
//! A missing file is an error; a malformed line is logged and skipped so
//! one bad record cannot abort a batch.

use std::fs;
use std::path::Path;

use ahash::AHashMap;

use crate::document::Document;
use crate::error::Result;
use crate::vector::TermVector;

/// Read precomputed expansion pairs, grouping them by original docno.
///
/// Records are `original_docno<delimiter>related_docno<delimiter>score`.
/// File order is preserved within each group; `max_neighbors` caps each
/// group.
pub fn read_expansion_pairs<P: AsRef<Path>>(
    path: P,
    delimiter: char,
    max_neighbors: Option<usize>,
) -> Result<AHashMap<String, Vec<Document>>> {
    let contents = fs::read_to_string(&path)?;
    let mut groups: AHashMap<String, Vec<Document>> = AHashMap::new();

    for (line_number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(delimiter).collect();
        let parsed = match fields.as_slice() {
            [original, related, score] => score
                .trim()
                .parse::<f64>()
                .ok()
                .map(|score| (original.trim(), related.trim(), score)),
            _ => None,
        };
        let Some((original, related, score)) = parsed else {
            log::warn!(
                "skipping malformed expansion pair on line {}: {line}",
                line_number + 1
            );
            continue;
        };

        let group = groups.entry(original.to_string()).or_default();
        if max_neighbors.is_none_or(|cap| group.len() < cap) {
            group.push(Document::new(related).with_score(score));
        }
    }

    Ok(groups)
}

/// Read premade pseudo-query vectors, one per docno.
///
/// Records are `docno<delimiter>term<delimiter>weight`.
pub fn read_pseudo_queries<P: AsRef<Path>>(
    path: P,
    delimiter: char,
) -> Result<AHashMap<String, TermVector>> {
    let contents = fs::read_to_string(&path)?;
    let mut queries: AHashMap<String, TermVector> = AHashMap::new();

    for (line_number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(delimiter).collect();
        let parsed = match fields.as_slice() {
            [docno, term, weight] => weight
                .trim()
                .parse::<f64>()
                .ok()
                .map(|weight| (docno.trim(), term.trim(), weight)),
            _ => None,
        };
        let Some((docno, term, weight)) = parsed else {
            log::warn!(
                "skipping malformed pseudo-query record on line {}: {line}",
                line_number + 1
            );
            continue;
        };
        queries
            .entry(docno.to_string())
            .or_default()
            .set_weight(term, weight);
    }

    Ok(queries)
}

/// Read a trec-style run file into per-query ranked hit lists.
///
/// Expected columns (whitespace-separated): `query Q0 docno rank score
/// tag`. Queries appear in file order; hits keep their file order within
/// each query.
pub fn read_run_file<P: AsRef<Path>>(path: P) -> Result<Vec<(String, Vec<Document>)>> {
    let contents = fs::read_to_string(&path)?;
    let mut batches: Vec<(String, Vec<Document>)> = Vec::new();

    for (line_number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let parsed = match fields.as_slice() {
            [query, _, docno, _, score, ..] => score
                .parse::<f64>()
                .ok()
                .map(|score| (*query, *docno, score)),
            _ => None,
        };
        let Some((query, docno, score)) = parsed else {
            log::warn!(
                "skipping malformed run-file line {}: {line}",
                line_number + 1
            );
            continue;
        };

        let hit = Document::new(docno).with_score(score);
        match batches.last_mut() {
            Some((current, hits)) if current == query => hits.push(hit),
            _ => batches.push((query.to_string(), vec![hit])),
        }
    }

    Ok(batches)
}
