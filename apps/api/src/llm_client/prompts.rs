// Shared prompt fragments used by every document template.
// Document-specific text lives in documents/prompts.rs.

use serde::Serialize;

/// Language of the fixed instruction scaffolding around a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    English,
    French,
}

/// Fixed phrases the synthesizer places between template fragments.
#[derive(Debug)]
pub struct Phrases {
    pub structure_intro: &'static str,
    pub primary_signals: &'static str,
    pub assign_if: &'static str,
    pub priority_hint: &'static str,
    pub example: &'static str,
}

const ENGLISH: Phrases = Phrases {
    structure_intro: "The structure must be:",
    primary_signals: "Primary signals:",
    assign_if: "Assign if",
    priority_hint: "If the answers match more than one rule, assign the FIRST matching one in the order listed above.",
    example: "Example",
};

const FRENCH: Phrases = Phrases {
    structure_intro: "La structure doit être :",
    primary_signals: "Signaux principaux :",
    assign_if: "À attribuer si",
    priority_hint: "Si les réponses correspondent à plusieurs règles, attribuez la PREMIÈRE règle correspondante dans l'ordre ci-dessus.",
    example: "Exemple",
};

pub fn phrases(locale: Locale) -> &'static Phrases {
    match locale {
        Locale::English => &ENGLISH,
        Locale::French => &FRENCH,
    }
}

/// Closing instruction that pins the response to bare HTML between two tags.
pub fn html_only_contract(locale: Locale, opening_tag: &str, closing_tag: &str) -> String {
    match locale {
        Locale::English => format!(
            "OUTPUT FORMAT (ABSOLUTE RULE)\n\
             IMPORTANT: Your entire response must be ONLY the HTML code itself. \
             It must begin with the opening {opening_tag} tag and end with the final {closing_tag} tag. \
             Do not add any commentary, greeting or explanation before or after the HTML. \
             Never use backticks or markdown code fences. \
             Never write the word \"html\" as a label anywhere in your response."
        ),
        Locale::French => format!(
            "RÈGLE ABSOLUE\n\
             IMPORTANT : Votre réponse doit commencer IMPÉRATIVEMENT par la balise {opening_tag} \
             et se terminer par la dernière balise {closing_tag}. \
             N'incluez AUCUN autre texte, commentaire ou explication avant ou après le code. \
             JAMAIS de backticks ni de bloc de code markdown, \
             et pas le mot 'html' avant ou après le code."
        ),
    }
}
