//! Overlay segments whose placement is extracted into feature tables.

/// A named overlay element searched for in every preview frame.
///
/// A segment fixes three names: the CSV column prefix, the template image
/// expected in each asset folder, and the output table file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    prefix: String,
    template_file: String,
    output_file: String,
}

impl Segment {
    /// Brand logo (`logo.png` → `logo_positions.csv`).
    pub fn logo() -> Self {
        Self::with_files("logo", "logo.png", "logo_positions.csv")
    }

    /// Call-to-action button (`cta.png` → `cta_txt_position.csv`).
    pub fn cta() -> Self {
        Self::with_files("cta", "cta.png", "cta_txt_position.csv")
    }

    /// Engagement instruction (`engagement_instruction.png` →
    /// `engagement_txt_positions.csv`).
    pub fn engagement() -> Self {
        Self::with_files(
            "engagement",
            "engagement_instruction.png",
            "engagement_txt_positions.csv",
        )
    }

    /// Arbitrary segment (`<name>.png` → `<name>_positions.csv`).
    pub fn named(name: &str) -> Self {
        Self::with_files(name, &format!("{name}.png"), &format!("{name}_positions.csv"))
    }

    /// Resolves a configured name: built-in names map to their fixed files,
    /// anything else becomes [`Segment::named`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "logo" => Self::logo(),
            "cta" => Self::cta(),
            "engagement" => Self::engagement(),
            other => Self::named(other),
        }
    }

    /// The built-in segments in extraction order.
    pub fn builtin() -> Vec<Self> {
        vec![Self::logo(), Self::cta(), Self::engagement()]
    }

    /// Creates a segment with explicit file names.
    pub fn with_files(prefix: &str, template_file: &str, output_file: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            template_file: template_file.to_owned(),
            output_file: output_file.to_owned(),
        }
    }

    /// Returns the CSV column prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the template file name inside each asset folder.
    pub fn template_file(&self) -> &str {
        &self.template_file
    }

    /// Returns the CSV file name inside the output directory.
    pub fn output_file(&self) -> &str {
        &self.output_file
    }
}
