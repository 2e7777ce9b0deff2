//! Keyword tables for the shipped languages.
//!
//! Step keywords carry their trailing space where the language separates the
//! keyword from the step text; elided forms such as `Lorsqu'` and languages
//! written without spaces list the bare keyword.

use super::KeywordTable;

pub(super) static ENGLISH: KeywordTable = KeywordTable {
    language: "en",
    feature: &["Feature", "Business Need", "Ability"],
    rule: &["Rule"],
    background: &["Background"],
    scenario: &["Scenario", "Example"],
    scenario_outline: &["Scenario Outline", "Scenario Template"],
    examples: &["Examples", "Scenarios"],
    given: &["Given "],
    when: &["When "],
    then: &["Then "],
    and: &["And ", "* "],
    but: &["But "],
};

static FRENCH: KeywordTable = KeywordTable {
    language: "fr",
    feature: &["Fonctionnalité"],
    rule: &["Règle"],
    background: &["Contexte"],
    scenario: &["Scénario", "Exemple"],
    scenario_outline: &["Plan du scénario", "Plan du Scénario"],
    examples: &["Exemples"],
    given: &[
        "Soit ",
        "Sachant que ",
        "Sachant qu'",
        "Sachant ",
        "Etant donné que ",
        "Etant donné qu'",
        "Etant donné ",
        "Etant donnée ",
        "Etant donnés ",
        "Etant données ",
        "Étant donné que ",
        "Étant donné qu'",
        "Étant donné ",
        "Étant donnée ",
        "Étant donnés ",
        "Étant données ",
    ],
    when: &["Quand ", "Lorsque ", "Lorsqu'"],
    then: &["Alors ", "Donc "],
    and: &["Et que ", "Et qu'", "Et ", "* "],
    but: &["Mais que ", "Mais qu'", "Mais "],
};

static SPANISH: KeywordTable = KeywordTable {
    language: "es",
    feature: &["Característica", "Necesidad del negocio", "Requisito"],
    rule: &["Regla de negocio", "Regla"],
    background: &["Antecedentes"],
    scenario: &["Escenario", "Ejemplo"],
    scenario_outline: &["Esquema del escenario"],
    examples: &["Ejemplos"],
    given: &["Dado ", "Dada ", "Dados ", "Dadas "],
    when: &["Cuando "],
    then: &["Entonces "],
    and: &["Y ", "E ", "* "],
    but: &["Pero "],
};

static GERMAN: KeywordTable = KeywordTable {
    language: "de",
    feature: &["Funktionalität", "Funktion"],
    rule: &["Regel", "Rule"],
    background: &["Grundlage", "Hintergrund", "Voraussetzungen", "Vorbedingungen"],
    scenario: &["Szenario", "Beispiel"],
    scenario_outline: &["Szenariogrundriss", "Szenarien"],
    examples: &["Beispiele"],
    given: &["Angenommen ", "Gegeben seien ", "Gegeben sei "],
    when: &["Wenn "],
    then: &["Dann "],
    and: &["Und ", "* "],
    but: &["Aber "],
};

static ITALIAN: KeywordTable = KeywordTable {
    language: "it",
    feature: &["Funzionalità", "Esigenza di Business", "Abilità"],
    rule: &["Regola"],
    background: &["Contesto"],
    scenario: &["Scenario", "Esempio"],
    scenario_outline: &["Schema dello scenario"],
    examples: &["Esempi"],
    given: &["Dato ", "Data ", "Dati ", "Date "],
    when: &["Quando "],
    then: &["Allora "],
    and: &["E ", "* "],
    but: &["Ma "],
};

static PORTUGUESE: KeywordTable = KeywordTable {
    language: "pt",
    feature: &["Funcionalidade", "Característica", "Caracteristica"],
    rule: &["Regra"],
    background: &["Contexto", "Cenário de Fundo", "Cenario de Fundo", "Fundo"],
    scenario: &["Exemplo", "Cenário", "Cenario"],
    scenario_outline: &[
        "Esquema do Cenário",
        "Esquema do Cenario",
        "Delineação do Cenário",
        "Delineacao do Cenario",
    ],
    examples: &["Exemplos", "Cenários", "Cenarios"],
    given: &["Dado ", "Dada ", "Dados ", "Dadas "],
    when: &["Quando "],
    then: &["Então ", "Entao "],
    and: &["E ", "* "],
    but: &["Mas "],
};

static DUTCH: KeywordTable = KeywordTable {
    language: "nl",
    feature: &["Functionaliteit"],
    rule: &["Regel"],
    background: &["Achtergrond"],
    scenario: &["Voorbeeld", "Scenario"],
    scenario_outline: &["Abstract Scenario"],
    examples: &["Voorbeelden"],
    given: &["Gegeven ", "Stel "],
    when: &["Als ", "Wanneer "],
    then: &["Dan "],
    and: &["En ", "* "],
    but: &["Maar "],
};

static JAPANESE: KeywordTable = KeywordTable {
    language: "ja",
    feature: &["フィーチャ", "機能"],
    rule: &["ルール"],
    background: &["背景"],
    scenario: &["シナリオ"],
    scenario_outline: &[
        "シナリオアウトライン",
        "シナリオテンプレート",
        "シナリオテンプレ",
        "テンプレ",
    ],
    examples: &["例", "サンプル"],
    given: &["前提"],
    when: &["もし"],
    then: &["ならば"],
    and: &["かつ", "* "],
    but: &["しかし", "但し", "ただし"],
};

pub(super) static TABLES: [&KeywordTable; 8] = [
    &ENGLISH,
    &FRENCH,
    &SPANISH,
    &GERMAN,
    &ITALIAN,
    &PORTUGUESE,
    &DUTCH,
    &JAPANESE,
];
