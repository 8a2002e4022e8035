//! Projects variants onto a residue-indexed layout.
//!
//! The layout has `sequence.len() + 2` slots: a leading deletion sentinel at
//! index 0, one slot per residue at `1..=N`, and a trailing deletion sentinel
//! at `N + 1`.

use crate::error::{Result, ViewerError};
use crate::evidence::group_evidences_by_code;
use crate::session::Session;
use crate::variants::fix_variants;
use protvista_protocol::{
    CategoryTrack, ExternalVariant, Feature, PlacedVariant, PositionSlot, VARIATION_CATEGORY,
    VariantEnvelope,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Substring over `residues` with the clamping and argument swap of a
/// half-open `[start, end)` window.
pub fn residue_window(residues: &[char], start: i64, end: i64) -> String {
    let len = residues.len() as i64;
    let mut from = start.clamp(0, len);
    let mut to = end.clamp(0, len);
    if from > to {
        std::mem::swap(&mut from, &mut to);
    }
    residues[from as usize..to as usize].iter().collect()
}

pub fn empty_layout(residues: &[char]) -> Vec<PositionSlot> {
    let mut slots = Vec::with_capacity(residues.len() + 2);
    slots.push(PositionSlot::deletion(0));
    slots.extend(
        residues
            .iter()
            .enumerate()
            .map(|(i, residue)| PositionSlot::residue(i + 1, residue.to_string())),
    );
    slots.push(PositionSlot::deletion(residues.len() + 1));
    slots
}

/// Index of the slot a variant starting at `begin` is stored in, if any.
/// A begin one past the last residue is stored with the last residue.
pub fn slot_index(begin: i64, sequence_len: usize) -> Option<usize> {
    let n = sequence_len as i64;
    if (1..=n).contains(&begin) {
        Some(begin as usize)
    } else if begin == n + 1 {
        Some(sequence_len)
    } else {
        None
    }
}

/// Moves the source-specific part of a variant under `externalData[source]`
/// when the source is external; canonical variants are kept as they are.
pub fn set_variant_data(external_source: Option<&str>, mut variant: Feature) -> PlacedVariant {
    let Some(source) = external_source else {
        return PlacedVariant::Native(variant);
    };
    let envelope = VariantEnvelope {
        feature_type: variant.feature_type.take(),
        begin: variant.begin.take(),
        end: variant.end.take(),
        wild_type: variant.wild_type.take(),
        alternative_sequence: variant.alternative_sequence.take(),
        source_type: variant.source_type.take(),
    };
    PlacedVariant::External(ExternalVariant {
        envelope,
        external_data: BTreeMap::from([(source.to_string(), variant)]),
    })
}

pub fn process_variants(
    session: &mut Session,
    mut variants: Vec<Feature>,
    sequence: Option<&str>,
    source: Option<&str>,
    evidence_already_grouped: bool,
) -> Result<Vec<CategoryTrack>> {
    let sequence = sequence.ok_or_else(|| {
        ViewerError::invalid_input("A sequence is required to lay out variants by position")
    })?;

    fix_variants(&mut variants);
    let external_source = source.filter(|s| session.is_external_source(Some(*s)));
    if external_source.is_some() {
        for variant in variants.iter_mut() {
            variant.category = None;
        }
    }
    if !evidence_already_grouped {
        group_evidences_by_code(&mut variants);
    }

    let residues: Vec<char> = sequence.chars().collect();
    let mut slots = empty_layout(&residues);
    let mut dropped = 0usize;

    for mut variant in variants {
        if let Some(consequence) = variant.consequence.as_deref().filter(|c| !c.is_empty()) {
            session.consequences.add(consequence);
        }
        let Some(begin) = variant.begin else {
            dropped += 1;
            continue;
        };
        let end = variant.end.filter(|e| *e != 0).unwrap_or(begin);
        variant.end = Some(end);
        if variant.wild_type.as_deref().is_none_or(str::is_empty) {
            variant.wild_type = Some(residue_window(&residues, begin, end.saturating_add(1)));
        }
        if let Some(source_type) = variant.source_type.as_mut() {
            *source_type = source_type.to_lowercase();
        }

        match slot_index(begin, residues.len()) {
            Some(index) => slots[index]
                .variants
                .push(set_variant_data(external_source, variant)),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(
            dropped,
            sequence_len = residues.len(),
            "Dropped variants outside of the sequence range"
        );
    }

    Ok(vec![CategoryTrack::positions(VARIATION_CATEGORY, slots)])
}
