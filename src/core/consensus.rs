use crate::core::data::SequenceRecord;
use crate::core::error::CoreError;
use tracing::{debug, trace};

/// Symbols tallied for the consensus, in tie-break order.
pub const CONSENSUS_SYMBOLS: [u8; 21] = *b"ACDEFGHIKLMNPQRSTVWY-";

fn symbol_index(byte: u8) -> Option<usize> {
    let upper = byte.to_ascii_uppercase();
    CONSENSUS_SYMBOLS.iter().position(|&symbol| symbol == upper)
}

/// Picks the majority symbol for one column from its tallies.
///
/// The first symbol to reach the maximum wins. Returns `None` when nothing was counted.
fn select_consensus_char(
    counts: &[u32; CONSENSUS_SYMBOLS.len()],
    visible_rows: usize,
) -> Option<u8> {
    let mut best: Option<(usize, u32)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if count > best.map_or(0, |(_, max)| max) {
            best = Some((index, count));
        }
    }

    let (index, max_count) = best?;
    let symbol = CONSENSUS_SYMBOLS[index];
    if (max_count as usize) * 2 <= visible_rows {
        Some(symbol.to_ascii_lowercase())
    } else {
        Some(symbol)
    }
}

/// Builds the consensus string over the visible records.
///
/// Residues outside the symbol table are ignored. A column where nothing was tallied
/// (no visible rows, or only unknown characters) is an error.
pub fn compute_consensus(
    records: &[SequenceRecord],
    sequence_length: usize,
) -> Result<Vec<u8>, CoreError> {
    if sequence_length == 0 {
        trace!("skipping consensus for empty alignment");
        return Ok(Vec::new());
    }

    let visible: Vec<&SequenceRecord> = records.iter().filter(|record| record.visible).collect();
    let mut consensus = Vec::with_capacity(sequence_length);

    for position in 0..sequence_length {
        let mut counts = [0u32; CONSENSUS_SYMBOLS.len()];
        for record in &visible {
            if let Some(index) = record
                .sequence
                .get(position)
                .and_then(|&byte| symbol_index(byte))
            {
                counts[index] += 1;
            }
        }

        let symbol = select_consensus_char(&counts, visible.len())
            .ok_or(CoreError::EmptyConsensusColumn { position })?;
        consensus.push(symbol);
    }

    debug!(
        visible_count = visible.len(),
        sequence_length, "completed consensus compute"
    );
    Ok(consensus)
}
