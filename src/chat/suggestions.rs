//! Follow-up question suggestions by health topic.

/// Maximum number of suggestions attached to one answer.
pub const MAX_SUGGESTIONS: usize = 3;

struct Topic {
    keywords: &'static [&'static str],
    suggestions: &'static [&'static str],
}

// Order matters: the first topic with a matching keyword wins.
const TOPICS: &[Topic] = &[
    Topic {
        keywords: &[
            "médicament", "medicament", "medication", "drug", "paracetamol", "paracétamol",
            "antibiotique", "antibiotic", "posologie", "dosage", "effets secondaires",
        ],
        suggestions: &[
            "Quels sont les effets secondaires du paracétamol ?",
            "Comment prendre correctement les antibiotiques ?",
            "Interactions médicamenteuses à éviter",
            "Que faire en cas d'oubli de médicament ?",
        ],
    },
    Topic {
        keywords: &[
            "cœur", "coeur", "cardiaque", "cardio", "hypertension", "tension", "heart",
            "blood pressure",
        ],
        suggestions: &[
            "Comment prévenir les maladies cardiovasculaires ?",
            "Quels sont les symptômes d'une crise cardiaque ?",
            "Comment gérer l'hypertension artérielle ?",
            "Quelle alimentation pour un cœur en bonne santé ?",
        ],
    },
    Topic {
        keywords: &[
            "avc", "migraine", "mémoire", "memoire", "cerveau", "alzheimer", "stroke",
            "headache", "maux de tête",
        ],
        suggestions: &[
            "Quels sont les signes d'un AVC ?",
            "Comment prévenir la maladie d'Alzheimer ?",
            "Que faire en cas de migraine sévère ?",
            "Comment améliorer sa mémoire ?",
        ],
    },
    Topic {
        keywords: &["diabète", "diabete", "diabetes", "glycémie", "glycemie", "insuline", "insulin"],
        suggestions: &[
            "Comment contrôler sa glycémie ?",
            "Quelle alimentation pour un diabétique ?",
            "Symptômes du diabète de type 2",
            "Comment prévenir les complications du diabète ?",
        ],
    },
    Topic {
        keywords: &[
            "vaccin", "vaccine", "prévention", "prevention", "immunitaire", "dépistage",
            "hygiène",
        ],
        suggestions: &[
            "Calendrier de vaccination pour adultes",
            "Comment renforcer son système immunitaire ?",
            "Dépistages recommandés par âge",
            "Hygiène de vie pour rester en bonne santé",
        ],
    },
    Topic {
        keywords: &["fièvre", "fievre", "fever", "douleur", "pain", "fatigue", "toux", "cough"],
        suggestions: &[
            "Que faire en cas de fièvre persistante ?",
            "Quand consulter pour des maux de tête ?",
            "Douleurs abdominales : causes possibles",
            "Fatigue chronique : que faire ?",
        ],
    },
];

/// Picks follow-up questions for a user message.
///
/// Returns `None` when the message matches no known topic. The question the
/// user just asked is never suggested back.
pub fn suggest_for(text: &str) -> Option<Vec<String>> {
    let lowered = text.to_lowercase();
    let topic = TOPICS
        .iter()
        .find(|t| t.keywords.iter().any(|k| lowered.contains(k)))?;

    let asked = text.trim().to_lowercase();
    let picks: Vec<String> = topic
        .suggestions
        .iter()
        .filter(|s| s.to_lowercase() != asked)
        .take(MAX_SUGGESTIONS)
        .map(|s| s.to_string())
        .collect();

    Some(picks)
}
