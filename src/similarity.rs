use crate::error::MergeError;
use crate::pot::ColorPot;

/// Default user-facing tolerance, matching the value the interactive
/// prompt suggests.
pub const DEFAULT_TOLERANCE: u8 = 8;

/// Validated merge tolerance.
///
/// The user-facing value is the largest acceptable average per-channel
/// difference, 1 to 255. Internally it is held pre-multiplied by 3 so the
/// first similarity condition can bound the plain sum of the three channel
/// differences without dividing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    sum_bound: u16,
}

impl Tolerance {
    /// Validate a user-facing tolerance value. Zero is rejected; zero
    /// would merge only exact duplicates of eligible pots, which the
    /// interactive prompt never offers, so it is treated as a caller bug.
    pub fn from_user(value: u8) -> Result<Self, MergeError> {
        if value == 0 {
            return Err(MergeError::InvalidTolerance(value));
        }
        Ok(Self {
            sum_bound: u16::from(value) * 3,
        })
    }

    /// The value the user chose.
    pub fn user_value(self) -> u8 {
        (self.sum_bound / 3) as u8
    }

    /// Upper bound for the summed per-channel difference.
    pub fn sum_bound(self) -> u16 {
        self.sum_bound
    }

    /// Upper bound for any channel's deviation from the mean difference,
    /// 15% of the summed bound.
    pub fn deviation_bound(self) -> f64 {
        f64::from(self.sum_bound) * 0.15
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            sum_bound: u16::from(DEFAULT_TOLERANCE) * 3,
        }
    }
}

/// Decide whether two pots are close enough to merge.
///
/// Both conditions are inclusive. First, the summed per-channel difference
/// must stay within [`sum_bound`](Tolerance::sum_bound). Second, no single
/// channel's difference may stray from the mean difference by more than
/// [`deviation_bound`](Tolerance::deviation_bound): this rejects pairs
/// whose distance is concentrated in one channel (a visible hue shift)
/// even when the total is small. Alpha is never compared; only opaque pots
/// reach this test.
pub fn is_similar(a: &ColorPot, b: &ColorPot, tolerance: Tolerance) -> bool {
    let dr = u16::from(a.rgba.r.abs_diff(b.rgba.r));
    let dg = u16::from(a.rgba.g.abs_diff(b.rgba.g));
    let db = u16::from(a.rgba.b.abs_diff(b.rgba.b));

    let sum = dr + dg + db;
    if sum > tolerance.sum_bound() {
        return false;
    }

    let mean = f64::from(sum) / 3.0;
    let deviation = (f64::from(dr) - mean)
        .abs()
        .max((f64::from(dg) - mean).abs())
        .max((f64::from(db) - mean).abs());
    deviation <= tolerance.deviation_bound()
}
