use serde::{Deserialize, Serialize};

use super::domain::InventoryKind;

/// Both supported inventories partition every domain into exactly three
/// facets; the scoring engine's flat domain mean relies on that partition.
pub const FACETS_PER_DOMAIN: usize = 3;

/// Qualitative band for a raw mean score. Display labels are an inventory
/// concern (BFI-2 calls the middle band "moderate", HEXACO "medium") and
/// live in [`LevelBands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Middle,
    High,
}

/// A band cut point. `exclusive` controls whether a raw score exactly at the
/// floor stays in the band below: BFI-2's high band starts strictly above
/// 3.5, while HEXACO's starts at 4.0 inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFloor {
    pub floor: f64,
    pub exclusive: bool,
}

impl BandFloor {
    pub const fn inclusive(floor: f64) -> Self {
        Self {
            floor,
            exclusive: false,
        }
    }

    pub const fn exclusive(floor: f64) -> Self {
        Self {
            floor,
            exclusive: true,
        }
    }

    fn admits(&self, raw: f64) -> bool {
        if self.exclusive {
            raw > self.floor
        } else {
            raw >= self.floor
        }
    }
}

/// Cut points and display labels for one inventory's three bands. The two
/// inventories are not interchangeable here; each taxonomy carries its own.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBands {
    pub high: BandFloor,
    pub middle: BandFloor,
    pub low_label: &'static str,
    pub middle_label: &'static str,
    pub high_label: &'static str,
}

impl LevelBands {
    pub fn classify(&self, raw: f64) -> ScoreBand {
        if self.high.admits(raw) {
            ScoreBand::High
        } else if self.middle.admits(raw) {
            ScoreBand::Middle
        } else {
            ScoreBand::Low
        }
    }

    pub fn label(&self, band: ScoreBand) -> &'static str {
        match band {
            ScoreBand::Low => self.low_label,
            ScoreBand::Middle => self.middle_label,
            ScoreBand::High => self.high_label,
        }
    }
}

/// Fixed prose shown for a domain at each band. One entry per band is
/// required structurally, so a missing combination cannot be configured.
#[derive(Debug, Clone, PartialEq)]
pub struct BandDescriptions {
    pub low: &'static str,
    pub middle: &'static str,
    pub high: &'static str,
}

impl BandDescriptions {
    pub fn for_band(&self, band: ScoreBand) -> &'static str {
        match band {
            ScoreBand::Low => self.low,
            ScoreBand::Middle => self.middle,
            ScoreBand::High => self.high,
        }
    }
}

/// One domain of an inventory: canonical name, its facet partition, and the
/// description table.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSpec {
    pub name: &'static str,
    pub facets: [&'static str; FACETS_PER_DOMAIN],
    pub descriptions: BandDescriptions,
}

/// Immutable inventory descriptor: canonical domain order, facet partition,
/// band thresholds, and descriptions. Passed by the caller into the scoring
/// engine; never held as ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    inventory: InventoryKind,
    domains: Vec<DomainSpec>,
    bands: LevelBands,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("taxonomy must define at least one domain")]
    Empty,
    #[error("duplicate domain '{0}' in taxonomy")]
    DuplicateDomain(String),
    #[error("duplicate facet '{facet}' under domain '{domain}'")]
    DuplicateFacet { domain: String, facet: String },
}

impl Taxonomy {
    pub fn new(
        inventory: InventoryKind,
        domains: Vec<DomainSpec>,
        bands: LevelBands,
    ) -> Result<Self, TaxonomyError> {
        if domains.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        for (index, spec) in domains.iter().enumerate() {
            if domains[..index].iter().any(|seen| seen.name == spec.name) {
                return Err(TaxonomyError::DuplicateDomain(spec.name.to_string()));
            }
            for (facet_index, facet) in spec.facets.iter().enumerate() {
                if spec.facets[..facet_index].contains(facet) {
                    return Err(TaxonomyError::DuplicateFacet {
                        domain: spec.name.to_string(),
                        facet: facet.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            inventory,
            domains,
            bands,
        })
    }

    pub fn inventory(&self) -> InventoryKind {
        self.inventory
    }

    /// Domains in canonical order; chart vectors and reports follow this
    /// ordering so attempts line up axis-for-axis across time.
    pub fn domains(&self) -> &[DomainSpec] {
        &self.domains
    }

    pub fn domain(&self, name: &str) -> Option<&DomainSpec> {
        self.domains.iter().find(|spec| spec.name == name)
    }

    pub fn bands(&self) -> &LevelBands {
        &self.bands
    }

    pub fn classify(&self, raw: f64) -> ScoreBand {
        self.bands.classify(raw)
    }

    /// The Big Five Inventory-2 taxonomy: five domains, bands low < 2.5,
    /// moderate 2.5..=3.5, high > 3.5.
    pub fn bfi2() -> Self {
        Self {
            inventory: InventoryKind::Bfi2,
            bands: LevelBands {
                high: BandFloor::exclusive(3.5),
                middle: BandFloor::inclusive(2.5),
                low_label: "low",
                middle_label: "moderate",
                high_label: "high",
            },
            domains: vec![
                DomainSpec {
                    name: "Extraversion",
                    facets: ["Sociability", "Assertiveness", "Energy Level"],
                    descriptions: BandDescriptions {
                        low: "You tend to be reserved, quiet, and prefer smaller social gatherings.",
                        middle: "You balance social engagement with solitary activities.",
                        high: "You are outgoing, energetic, and enjoy being around people.",
                    },
                },
                DomainSpec {
                    name: "Agreeableness",
                    facets: ["Compassion", "Respectfulness", "Trust"],
                    descriptions: BandDescriptions {
                        low: "You tend to be competitive, skeptical, and straightforward in your approach.",
                        middle: "You balance cooperation with standing up for your own interests.",
                        high: "You are compassionate, trusting, and cooperative with others.",
                    },
                },
                DomainSpec {
                    name: "Conscientiousness",
                    facets: ["Organization", "Productiveness", "Responsibility"],
                    descriptions: BandDescriptions {
                        low: "You tend to be flexible, spontaneous, and comfortable with disorder.",
                        middle: "You balance organization with flexibility in your approach.",
                        high: "You are organized, disciplined, and goal-oriented.",
                    },
                },
                DomainSpec {
                    name: "Negative Emotionality",
                    facets: ["Anxiety", "Depression", "Emotional Volatility"],
                    descriptions: BandDescriptions {
                        low: "You tend to be emotionally stable, calm, and resilient under stress.",
                        middle: "You experience a normal range of emotional ups and downs.",
                        high: "You may experience frequent worry, mood swings, and emotional sensitivity.",
                    },
                },
                DomainSpec {
                    name: "Open-Mindedness",
                    facets: [
                        "Aesthetic Sensitivity",
                        "Intellectual Curiosity",
                        "Creative Imagination",
                    ],
                    descriptions: BandDescriptions {
                        low: "You prefer familiar experiences and conventional approaches.",
                        middle: "You balance openness to new experiences with appreciation for tradition.",
                        high: "You are curious, creative, and open to new experiences and ideas.",
                    },
                },
            ],
        }
    }

    /// The HEXACO taxonomy: six factors plus the interstitial Altruism
    /// pseudo-domain, bands high >= 4.0, medium >= 3.0, low otherwise.
    pub fn hexaco() -> Self {
        Self {
            inventory: InventoryKind::Hexaco,
            bands: LevelBands {
                high: BandFloor::inclusive(4.0),
                middle: BandFloor::inclusive(3.0),
                low_label: "low",
                middle_label: "medium",
                high_label: "high",
            },
            domains: vec![
                DomainSpec {
                    name: "Honesty-Humility",
                    facets: ["Sincerity", "Fairness", "Modesty"],
                    descriptions: BandDescriptions {
                        low: "You may be more willing to flatter others to get what you want, and you might feel entitled to special treatment or privileges.",
                        middle: "You show a balanced approach to honesty and humility, being generally fair and modest while occasionally being strategic in social situations.",
                        high: "You tend to be sincere, fair, modest, and unassuming. You are likely to be genuine in your interactions with others and avoid manipulative behaviors.",
                    },
                },
                DomainSpec {
                    name: "Emotionality",
                    facets: ["Fearfulness", "Anxiety", "Sentimentality"],
                    descriptions: BandDescriptions {
                        low: "You tend to be emotionally stable, less likely to worry excessively, and comfortable taking risks when necessary.",
                        middle: "You show a balanced emotional response, being neither overly emotional nor completely detached from your feelings.",
                        high: "You tend to experience emotions deeply, may be sensitive to stress, and likely value emotional support from others. You might be cautious in potentially dangerous situations.",
                    },
                },
                DomainSpec {
                    name: "Extraversion",
                    facets: ["Social Boldness", "Sociability", "Liveliness"],
                    descriptions: BandDescriptions {
                        low: "You tend to be more reserved, prefer smaller groups or one-on-one interactions, and may feel less comfortable being the center of attention.",
                        middle: "You show a balanced approach to social situations, being comfortable in groups but also enjoying alone time.",
                        high: "You are likely to be outgoing, confident, energetic, and comfortable in social situations. You probably enjoy being the center of attention and leading others.",
                    },
                },
                DomainSpec {
                    name: "Agreeableness",
                    facets: ["Forgivingness", "Gentleness", "Patience"],
                    descriptions: BandDescriptions {
                        low: "You may be more critical of others, hold grudges, and be less willing to compromise. You might be more competitive in your relationships.",
                        middle: "You show a balanced approach to interpersonal relationships, being generally cooperative but also standing up for yourself when needed.",
                        high: "You tend to be forgiving, lenient, flexible, and patient with others. You likely avoid conflict and prefer to cooperate rather than compete.",
                    },
                },
                DomainSpec {
                    name: "Conscientiousness",
                    facets: ["Organization", "Diligence", "Prudence"],
                    descriptions: BandDescriptions {
                        low: "You may be more spontaneous, less concerned with organization, and more willing to take shortcuts or be flexible with rules.",
                        middle: "You show a balanced approach to organization and discipline, being generally reliable but also flexible when needed.",
                        high: "You tend to be organized, disciplined, careful, and thorough in your work. You likely set high standards for yourself and others.",
                    },
                },
                DomainSpec {
                    name: "Openness to Experience",
                    facets: ["Aesthetic Appreciation", "Inquisitiveness", "Creativity"],
                    descriptions: BandDescriptions {
                        low: "You tend to prefer familiar experiences, conventional approaches, and may be less interested in abstract or artistic pursuits.",
                        middle: "You show a balanced approach to new experiences, being open to some new ideas while also valuing tradition and convention.",
                        high: "You tend to be curious, creative, unconventional, and interested in art, ideas, and new experiences. You likely enjoy intellectual discussions and novel situations.",
                    },
                },
                DomainSpec {
                    name: "Altruism (interstitial)",
                    facets: ["Generosity", "Compassion", "Helpfulness"],
                    descriptions: BandDescriptions {
                        low: "You may be more focused on your own interests and less likely to prioritize helping others or engaging in altruistic behaviors.",
                        middle: "You show a balanced approach to helping others, being generally considerate while also attending to your own needs.",
                        high: "You tend to be altruistic, generous, and concerned with helping others. You likely prioritize the welfare of others and engage in prosocial behaviors.",
                    },
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bfi2_bands_keep_boundary_scores_in_the_middle() {
        let taxonomy = Taxonomy::bfi2();
        assert_eq!(taxonomy.classify(2.49), ScoreBand::Low);
        assert_eq!(taxonomy.classify(2.5), ScoreBand::Middle);
        assert_eq!(taxonomy.classify(3.5), ScoreBand::Middle);
        assert_eq!(taxonomy.classify(3.51), ScoreBand::High);
        assert_eq!(taxonomy.bands().label(ScoreBand::Middle), "moderate");
    }

    #[test]
    fn hexaco_bands_use_inclusive_floors_and_medium_label() {
        let taxonomy = Taxonomy::hexaco();
        assert_eq!(taxonomy.classify(2.99), ScoreBand::Low);
        assert_eq!(taxonomy.classify(3.0), ScoreBand::Middle);
        assert_eq!(taxonomy.classify(3.99), ScoreBand::Middle);
        assert_eq!(taxonomy.classify(4.0), ScoreBand::High);
        assert_eq!(taxonomy.bands().label(ScoreBand::Middle), "medium");
    }

    #[test]
    fn builtin_taxonomies_match_their_inventories() {
        let bfi2 = Taxonomy::bfi2();
        assert_eq!(bfi2.inventory(), InventoryKind::Bfi2);
        assert_eq!(bfi2.domains().len(), 5);

        let hexaco = Taxonomy::hexaco();
        assert_eq!(hexaco.inventory(), InventoryKind::Hexaco);
        assert_eq!(hexaco.domains().len(), 7);
        assert!(hexaco.domain("Altruism (interstitial)").is_some());
    }

    #[test]
    fn duplicate_domains_are_rejected() {
        let spec = DomainSpec {
            name: "Extraversion",
            facets: ["A", "B", "C"],
            descriptions: BandDescriptions {
                low: "l",
                middle: "m",
                high: "h",
            },
        };
        let result = Taxonomy::new(
            InventoryKind::Bfi2,
            vec![spec.clone(), spec],
            Taxonomy::bfi2().bands.clone(),
        );
        assert!(matches!(result, Err(TaxonomyError::DuplicateDomain(_))));
    }

    #[test]
    fn duplicate_facets_are_rejected() {
        let spec = DomainSpec {
            name: "Extraversion",
            facets: ["A", "A", "C"],
            descriptions: BandDescriptions {
                low: "l",
                middle: "m",
                high: "h",
            },
        };
        let result = Taxonomy::new(
            InventoryKind::Bfi2,
            vec![spec],
            Taxonomy::bfi2().bands.clone(),
        );
        assert!(matches!(result, Err(TaxonomyError::DuplicateFacet { .. })));
    }
}
