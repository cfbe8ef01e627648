use super::section::Section;

/// The full set of named sections making up one configuration generation
///
/// Names are expected to be unique. Nothing here deduplicates them: when the
/// snapshot is persisted, the second section with a repeated name hits the
/// exclusive-create guard and the whole persist fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    sections: Vec<Section>,
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with_section(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.push(Section::new(name, content));
        self
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// First section with the given name
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sum of all section content lengths
    pub fn total_bytes(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }
}

impl From<Vec<Section>> for ConfigSnapshot {
    fn from(sections: Vec<Section>) -> Self {
        Self { sections }
    }
}

impl<N, C> FromIterator<(N, C)> for ConfigSnapshot
where
    N: Into<String>,
    C: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self {
            sections: iter
                .into_iter()
                .map(|(name, content)| Section::new(name, content))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigSnapshot {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
