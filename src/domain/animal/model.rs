use std::collections::BTreeMap;

/// ISO 639-1 language codes narrated by the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    Indonesian,
}

impl Language {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Narration category, mapped to a storage folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Description,
    FunFact,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Description => "description",
            Category::FunFact => "funfact",
        }
    }

    /// Storage folder under `audio/`
    fn folder(&self) -> &'static str {
        match self {
            Category::Description => "descriptions",
            Category::FunFact => "funfacts",
        }
    }
}

/// A narratable field: category plus language.
///
/// Derives the three names tied to one narration: the source text field on
/// the document, the audio URL field written back, and the object-storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKind {
    pub category: Category,
    pub language: Language,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind {
            category: Category::Description,
            language: Language::English,
        },
        FieldKind {
            category: Category::Description,
            language: Language::Indonesian,
        },
        FieldKind {
            category: Category::FunFact,
            language: Language::English,
        },
        FieldKind {
            category: Category::FunFact,
            language: Language::Indonesian,
        },
    ];

    /// Name of the source text field on the animal document
    pub fn text_field(&self) -> String {
        match self.category {
            Category::Description => format!("description_{}", self.language),
            Category::FunFact => format!("fun_fact_{}", self.language),
        }
    }

    /// Name of the audio URL field written back to the document.
    ///
    /// Descriptions use the plain `audio_url_{lang}` schema; fun facts are
    /// qualified so both narrations can live on the same record.
    pub fn url_field(&self) -> String {
        match self.category {
            Category::Description => format!("audio_url_{}", self.language),
            Category::FunFact => format!("audio_funfact_url_{}", self.language),
        }
    }

    /// Object-storage key for the uploaded MP3
    pub fn storage_key(&self, animal_id: &str) -> String {
        format!(
            "audio/{}/{}_{}.mp3",
            self.category.folder(),
            animal_id,
            self.language
        )
    }

    /// Local spool file name, namespaced by record id and field kind
    pub fn file_name(&self, animal_id: &str) -> String {
        format!("{}_{}_{}.mp3", animal_id, self.category.as_str(), self.language)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.category.as_str(), self.language)
    }
}

/// A single animal document from the `animals` collection
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: String,
    pub name: String,
    /// Recognized text fields present on the document (may hold empty strings)
    pub texts: BTreeMap<FieldKind, String>,
}

impl Animal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            texts: BTreeMap::new(),
        }
    }

    pub fn with_text(mut self, kind: FieldKind, text: impl Into<String>) -> Self {
        self.texts.insert(kind, text.into());
        self
    }

    /// Fields with usable (non-blank) text, in stable order
    pub fn narratable_fields(&self) -> Vec<(FieldKind, &str)> {
        FieldKind::ALL
            .iter()
            .filter_map(|kind| {
                self.texts
                    .get(kind)
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .map(|t| (*kind, t))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DESC_EN: FieldKind = FieldKind {
        category: Category::Description,
        language: Language::English,
    };
    const FUNFACT_ID: FieldKind = FieldKind {
        category: Category::FunFact,
        language: Language::Indonesian,
    };

    #[test]
    fn test_field_names_for_descriptions() {
        assert_eq!(DESC_EN.text_field(), "description_en");
        assert_eq!(DESC_EN.url_field(), "audio_url_en");
        assert_eq!(DESC_EN.storage_key("a1"), "audio/descriptions/a1_en.mp3");
        assert_eq!(DESC_EN.file_name("a1"), "a1_description_en.mp3");
    }

    #[test]
    fn test_field_names_for_fun_facts() {
        assert_eq!(FUNFACT_ID.text_field(), "fun_fact_id");
        assert_eq!(FUNFACT_ID.url_field(), "audio_funfact_url_id");
        assert_eq!(FUNFACT_ID.storage_key("a1"), "audio/funfacts/a1_id.mp3");
        assert_eq!(FUNFACT_ID.file_name("a1"), "a1_funfact_id.mp3");
    }

    #[test]
    fn test_narratable_fields_skips_blank_text() {
        let animal = Animal::new("a1", "Tiger")
            .with_text(DESC_EN, "A large cat.")
            .with_text(FUNFACT_ID, "   ");

        let fields = animal.narratable_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0], (DESC_EN, "A large cat."));
    }

    #[test]
    fn test_narratable_fields_empty_when_no_text() {
        let animal = Animal::new("a2", "Ghost");
        assert!(animal.narratable_fields().is_empty());
    }

    #[test]
    fn test_narratable_fields_order_is_stable() {
        let animal = Animal::new("a3", "Komodo")
            .with_text(FUNFACT_ID, "fakta")
            .with_text(DESC_EN, "A big lizard.");

        let kinds: Vec<FieldKind> = animal
            .narratable_fields()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(kinds, vec![DESC_EN, FUNFACT_ID]);
    }
}
