/// Letter-grade tokens and the points they are worth, in display order.
///
/// | Grade | Points |
/// |-------|--------|
/// | A+    | 4.0    |
/// | A     | 3.7    |
/// | B+    | 3.3    |
/// | B     | 3.0    |
/// | C+    | 2.7    |
/// | C     | 2.3    |
/// | D     | 2.0    |
/// | F     | 0.0    |
static STANDARD_POINTS: &[(&str, f64)] = &[
    ("A+", 4.0),
    ("A", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("C+", 2.7),
    ("C", 2.3),
    ("D", 2.0),
    ("F", 0.0),
];

/// A fixed mapping from letter grade to grade point.
///
/// Tokens are stored upper-case and looked up case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeScale {
    entries: &'static [(&'static str, f64)],
}

impl GradeScale {
    /// The institutional 4.0 scale.
    pub const STANDARD: GradeScale = GradeScale::new(STANDARD_POINTS);

    /// A scale over `entries`, whose tokens must be upper-case.
    pub const fn new(entries: &'static [(&'static str, f64)]) -> Self {
        GradeScale { entries }
    }

    /// Returns the point value for `token`, ignoring case.
    pub fn point(&self, token: &str) -> Option<f64> {
        let token = token.to_uppercase();
        self.entries
            .iter()
            .find(|(grade, _)| *grade == token)
            .map(|(_, points)| *points)
    }

    /// Returns `true` if `token` names a grade on this scale.
    pub fn contains(&self, token: &str) -> bool {
        self.point(token).is_some()
    }

    /// Grade tokens in table order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(grade, _)| *grade)
    }

    /// `(token, points)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Comma-separated list of valid tokens, e.g. `A+, A, B+`.
    pub fn describe(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(", ")
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::STANDARD
    }
}
