//! Beam band overlap and per-card reveal boundaries.
//!
//! Pure geometry: card bounds in, clip percentages out. Plain faces clip from
//! the right (`--clip-right`), decoded faces clip from the left (`--clip-left`).

/// Horizontal extent of a card on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardBounds {
    pub left: f32,
    pub right: f32,
}

impl CardBounds {
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// The fixed scan band, centred on the viewport midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamBand {
    pub left: f32,
    pub right: f32,
}

impl BeamBand {
    pub fn centered(viewport_width: f32, band_width: f32) -> Self {
        let x = viewport_width * 0.5;
        Self {
            left: x - band_width * 0.5,
            right: x + band_width * 0.5,
        }
    }

    #[inline]
    pub fn overlaps(&self, card: &CardBounds) -> bool {
        card.left < self.right && card.right > self.left
    }
}

/// Where a card sits relative to the band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPhase {
    /// Wholly right of the band, not yet scanned: fully plain.
    Ahead,
    Scanning,
    /// Wholly left of the band: fully decoded.
    Passed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardReveal {
    pub phase: CardPhase,
    /// The plain face shows `[0, plain_clip_right)` percent of the card.
    pub plain_clip_right: f32,
    /// The decoded face shows `[decoded_clip_left, 100]`.
    pub decoded_clip_left: f32,
    pub scanned: bool,
    /// Marker differs from the previous frame; the adapter only writes then.
    pub scanned_changed: bool,
}

impl CardReveal {
    /// Share of the card covered by the band seam, in percent.
    #[inline]
    pub fn seam_percent(&self) -> f32 {
        self.decoded_clip_left - self.plain_clip_right
    }
}

/// Boundaries for one card. `was_scanned` is last frame's marker.
pub fn reveal_for(card: CardBounds, band: BeamBand, was_scanned: bool) -> CardReveal {
    let width = card.width();
    if width > 0.0 && band.overlaps(&card) {
        let intersect_left = (band.left - card.left).max(0.0);
        let intersect_right = (band.right - card.left).min(width);
        let scanned = was_scanned || intersect_left > 0.0;
        return CardReveal {
            phase: CardPhase::Scanning,
            plain_clip_right: intersect_left / width * 100.0,
            decoded_clip_left: intersect_right / width * 100.0,
            scanned,
            scanned_changed: scanned != was_scanned,
        };
    }
    let (phase, pct) = if width > 0.0 && card.right <= band.left {
        (CardPhase::Passed, 100.0)
    } else {
        (CardPhase::Ahead, 0.0)
    };
    CardReveal {
        phase,
        plain_clip_right: pct,
        decoded_clip_left: pct,
        scanned: false,
        scanned_changed: was_scanned,
    }
}

/// Read pass results in, write pass payload out. Returns whether any card is
/// under the band. `scanned` carries the marker across frames.
pub fn compute_reveals(
    cards: &[CardBounds],
    band: BeamBand,
    scanned: &mut Vec<bool>,
    out: &mut Vec<CardReveal>,
) -> bool {
    scanned.resize(cards.len(), false);
    out.clear();
    let mut any = false;
    for (card, mark) in cards.iter().zip(scanned.iter_mut()) {
        let r = reveal_for(*card, band, *mark);
        any |= r.phase == CardPhase::Scanning;
        *mark = r.scanned;
        out.push(r);
    }
    any
}
