//! Hot-update requirement wiring.
//!
//! Mirrors what a hot module replacement plugin adds to a chunk's runtime
//! requirements before the requirement hooks fire.

use splice_core::{RuntimeGlobal, RuntimeRequirements};

/// Globals every entry chunk needs when hot updates are enabled.
pub const ENTRY_HOT_REQUIREMENTS: [RuntimeGlobal; 5] = [
    RuntimeGlobal::HmrDownloadUpdateHandlers,
    RuntimeGlobal::HmrDownloadManifest,
    RuntimeGlobal::HmrModuleData,
    RuntimeGlobal::HmrInvalidateModuleHandlers,
    RuntimeGlobal::GetFullHash,
];

/// Add the requirements implied by `requirements` (and by hot updates, if
/// `hot`) for one chunk.
///
/// Returns the number of globals added.
pub fn wire_requirements(requirements: &mut RuntimeRequirements, entry: bool, hot: bool) -> usize {
    let before = requirements.len();

    if hot && entry {
        requirements.extend(ENTRY_HOT_REQUIREMENTS);
    }
    if requirements.contains(RuntimeGlobal::EnsureChunk) {
        let _ = requirements.insert(RuntimeGlobal::EnsureChunkHandlers);
    }

    requirements.len() - before
}
