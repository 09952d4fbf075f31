/// Time-remapping curves applied to linear progress `t` in `[0, 1]`.
///
/// Every curve maps `0 -> 0` and `1 -> 1` exactly. The short names `linear`, `easeOut` and
/// `easeInOut` are accepted when deserializing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    #[serde(alias = "linear")]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    #[serde(alias = "easeOut", alias = "ease_out")]
    OutCubic,
    #[serde(alias = "easeInOut", alias = "ease_in_out")]
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// Blend `from -> to` by the eased value of `t`.
    ///
    /// Returns `to` bit-exactly once the eased weight reaches 1.
    pub fn blend(self, from: f64, to: f64, t: f64) -> f64 {
        let w = self.apply(t);
        if w >= 1.0 {
            to
        } else if w <= 0.0 {
            from
        } else {
            from + (to - from) * w
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
