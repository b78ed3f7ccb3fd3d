use drill_core::model::{Difficulty, Item, ItemId, Scenario, ScenarioId};

use super::PASSWORD_SECURITY;

const STRENGTHS: [&str; 3] = ["weak", "medium", "strong"];

/// `(password, strength, estimated crack time, main issue)`
const PASSWORDS: [(&str, &str, &str, &str); 5] = [
    (
        "password123",
        "weak",
        "less than 1 second",
        "a dictionary word followed by a predictable number sequence",
    ),
    (
        "MyDog2023!",
        "medium",
        "2 hours",
        "personal information in a predictable pattern",
    ),
    (
        "Tr0ub4dor&3",
        "medium",
        "3 days",
        "a well-known character substitution pattern",
    ),
    (
        "correct horse battery staple",
        "strong",
        "550 years",
        "a famous example phrase with no numbers or symbols",
    ),
    (
        "P@ssw0rd!2024#Security",
        "strong",
        "34,000 years",
        "obvious security-related terms",
    ),
];

pub(super) fn scenario() -> Result<Scenario, drill_core::Error> {
    let items = PASSWORDS
        .iter()
        .enumerate()
        .map(|(i, (password, strength, crack_time, issue))| -> Result<Item, drill_core::Error> {
            let explanation =
                format!("Rated {strength}: cracked in about {crack_time}. Watch out for {issue}.");
            Ok(Item::multiple_choice(
                ItemId::new(format!("password-{}", i + 1))?,
                format!("How strong is this password?\n\n    {password}"),
                STRENGTHS,
                *strength,
                10,
            )?
            .with_explanation(explanation))
        })
        .collect::<Result<Vec<_>, drill_core::Error>>()?;

    Ok(Scenario::new(
        ScenarioId::new(PASSWORD_SECURITY)?,
        super::module_id(PASSWORD_SECURITY)?,
        "Password Security",
        900,
        items,
    )?
    .with_description("Rate each password as weak, medium or strong.")
    .with_difficulty(Difficulty::Beginner))
}
