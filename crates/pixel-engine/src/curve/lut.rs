//! 256-entry byte lookup tables.

/// Maps each input byte to an output byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut([u8; 256]);

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}

impl Lut {
    /// The table mapping every byte to itself.
    pub fn identity() -> Self {
        Self::from_fn(|v| v)
    }

    /// Tabulate `f` over every input byte.
    pub fn from_fn(mut f: impl FnMut(u8) -> u8) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = f(i as u8);
        }
        Self(table)
    }

    /// Output for `value`.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.0[value as usize]
    }

    /// `self` first, then `then`: `result[v] = then[self[v]]`.
    ///
    /// ```
    /// use pixel_engine::Lut;
    ///
    /// let halve = Lut::from_fn(|v| v / 2);
    /// let negate = Lut::from_fn(|v| 255 - v);
    /// assert_eq!(halve.compose(&negate).apply(200), 155);
    /// assert_eq!(negate.compose(&halve).apply(200), 27);
    /// ```
    pub fn compose(&self, then: &Lut) -> Lut {
        Lut::from_fn(|v| then.apply(self.apply(v)))
    }

    /// True when every entry maps to itself.
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| i == v as usize)
    }
}
