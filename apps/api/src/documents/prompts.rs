// Template records for every document type.
// `{field}` placeholders are filled from the answer set by the synthesizer.

use crate::documents::template::{
    AnswerField, Classification, ClassificationRule, DocumentKind, DocumentTemplate,
    FallbackFragments, OutputContract, SectionDirective,
};
use crate::llm_client::prompts::Locale;

const HTML_CONTRACT: OutputContract = OutputContract {
    opening_tag: "<h2>",
    closing_tag: "</p>",
};

// ────────────────────────────────────────────────────────────────────────────
// Founder's Clarity Map
// ────────────────────────────────────────────────────────────────────────────

static FOUNDER_ARCHETYPES: Classification = Classification {
    signals: "Use their 'Next Level' goal and 'Mental Energy' drain as the primary signals.",
    rules: &[
        ClassificationRule {
            category: "The Visionary Bottleneck",
            condition: "their bottleneck sounds like they are the central point of failure for all decisions, \
                or their energy drain is 'Personal Burnout' combined with an ambitious goal.",
        },
        ClassificationRule {
            category: "The Scaling Architect",
            condition: "their goal is 'Scale Operations & Team' and their energy drain is \
                'Team / Operations' or 'Sales / Marketing'.",
        },
        ClassificationRule {
            category: "The Freedom Seeker",
            condition: "their goal is 'Increase Personal Freedom' and their energy drain is \
                'Personal Burnout', or they feel overwhelmed by operational tasks.",
        },
        ClassificationRule {
            category: "The Pre-Launch Grinder",
            condition: "their mission sounds early-stage and their goal is \
                'Achieve Product-Market Fit' or 'Secure Funding'.",
        },
    ],
};

pub static CLARITY_MAP: DocumentTemplate = DocumentTemplate {
    kind: DocumentKind::ClarityMap,
    version: 2,
    title: "Founder's Clarity Map",
    locale: Locale::English,
    persona: "You are an AI model of Will Bryant, a startup business coach. \
        Your tone is enabling, empowering, and direct. You provide actionable advice.",
    subject: "A founder named {name} has just completed your \"Clarity Engine\" diagnostic. \
        Their answers are:",
    fields: &[
        AnswerField {
            key: "name",
            label: "Founder Name",
        },
        AnswerField {
            key: "mission",
            label: "Primary Mission",
        },
        AnswerField {
            key: "next_level",
            label: "'Next Level' Goal",
        },
        AnswerField {
            key: "bottleneck",
            label: "Biggest Ambiguity/Bottleneck",
        },
        AnswerField {
            key: "mental_energy",
            label: "Main Mental Energy Drain",
        },
        AnswerField {
            key: "first_action",
            label: "First Action with a Clear Plan",
        },
    ],
    task: "Your task is to generate a personalized \"Founder's Clarity Map\" for {name}, \
        formatted as clean HTML.",
    sections: &[
        SectionDirective {
            tag: "h2",
            title: "Main Title",
            directive: "{name}'s Founder Clarity Map",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "Your Founder Archetype",
            directive: "Assign exactly ONE founder archetype using the rules below, \
                state it, and provide a one-paragraph description.",
            example: None,
            classification: Some(&FOUNDER_ARCHETYPES),
        },
        SectionDirective {
            tag: "h3",
            title: "Current Situation Analysis",
            directive: "A sharp, empathetic summary of their current state.",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "The Core Tension",
            directive: "Identify the central conflict, linking their goal and energy drain to their archetype.",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "Your Actionable First Step",
            directive: "Reframe their 'First Action with a Clear Plan' answer as a strategic directive.",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "Roadmap to Your Client OS",
            directive: "Briefly describe how this initial clarity map can evolve into a full \"Client OS\". \
                Provide a short, exciting paragraph outlining a possible automated workflow \
                tailored to their archetype.",
            example: Some(
                "This clarity map is just the beginning. The next step is to transform this analysis \
                into a living 'Client OS.' Imagine a system where, based on your Scaling Architect profile, \
                a workflow is automatically triggered: a pre-call module on delegation is sent to you, \
                a follow-up task to define key metrics is added to a shared dashboard, and your progress \
                is tracked against the goal of scaling your team. That's the power of an automated coaching system.",
            ),
            classification: None,
        },
    ],
    contract: HTML_CONTRACT,
    model: "gemini-2.0-flash",
    temperature: None,
    response_field: "blueprintHtml",
    fallbacks: FallbackFragments {
        provider_error: "<div class='text-center p-8'><h3 class='text-2xl font-bold text-red-600'>ERROR</h3>\
            <p class='text-lg text-gray-600 mt-4'>Could not generate your blueprint.</p></div>",
        empty_completion: "<h3>Error</h3><p>Could not generate your blueprint.</p>",
    },
};

// ────────────────────────────────────────────────────────────────────────────
// Simulation de Projet (The Foundry)
// ────────────────────────────────────────────────────────────────────────────

pub static PROJECT_BRIEF: DocumentTemplate = DocumentTemplate {
    kind: DocumentKind::ProjectBrief,
    version: 3,
    title: "Simulation de Projet",
    locale: Locale::French,
    persona: "Vous êtes l'IA de \"The Foundry\", un hub exclusif pour les développeurs d'élite (\"Membres\") \
        et les porteurs de projets innovants (\"Utilisateurs\"). Votre ton est expert, rassurant et visionnaire.",
    subject: "Un utilisateur nommé {name} vient de terminer le simulateur. Ses réponses sont :",
    fields: &[
        AnswerField {
            key: "name",
            label: "Nom",
        },
        AnswerField {
            key: "project_type",
            label: "Type de projet",
        },
        AnswerField {
            key: "main_goal",
            label: "Objectif N°1",
        },
        AnswerField {
            key: "budget_range",
            label: "Budget",
        },
    ],
    task: "Votre mission : générer une \"Simulation de Projet\" en deux visions claires, directement en HTML. \
        Utilisez uniquement des balises h2, h3, p, ul, li, strong et hr, sans attribut style.",
    sections: &[
        SectionDirective {
            tag: "h2",
            title: "Titre principal",
            directive: "Simulation de Projet pour {name}",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "Vision 1 : Votre Projet, Concrétisé",
            directive: "Ouvrez par un paragraphe rappelant qu'il s'agit de la synthèse de sa demande et que \
                nous avons écouté attentivement son besoin initial. Décrivez ensuite le projet tel que demandé : \
                périmètre, fonctionnalités clés adaptées au type de projet et à l'objectif N°1, \
                et ce qu'il est réaliste de livrer dans le budget indiqué.",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "Vision 2 : Votre Projet, Augmenté",
            directive: "Précédée d'une balise <hr>. Montrez comment les Membres de The Foundry pourraient \
                aller plus loin : automatisations, intelligence artificielle, évolutivité. Donnez deux ou trois \
                propositions concrètes qui servent directement l'objectif N°1.",
            example: None,
            classification: None,
        },
        SectionDirective {
            tag: "h3",
            title: "Prochaines Étapes",
            directive: "Précédée d'une balise <hr>. Terminez par ce paragraphe, mot pour mot : \
                « Cette simulation a été enregistrée. The Foundry est actuellement en lancement privé. \
                Un membre de notre équipe vous contactera prochainement pour discuter de la manière dont \
                nous pouvons transformer ce brief en réalité, et explorer tout son potentiel. »",
            example: None,
            classification: None,
        },
    ],
    contract: HTML_CONTRACT,
    model: "gemini-1.5-flash-latest",
    temperature: Some(0.6),
    response_field: "briefHtml",
    fallbacks: FallbackFragments {
        provider_error: "<div class='text-center p-8'><h3 class='text-2xl font-bold text-red-600'>Erreur Serveur</h3>\
            <p class='text-lg text-gray-600 mt-4'>Nous avons rencontré un problème en générant votre simulation.</p></div>",
        empty_completion: "<h3>Erreur</h3><p>Le contenu n'a pas pu être généré.</p>",
    },
};
