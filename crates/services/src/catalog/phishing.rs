use drill_core::model::{Difficulty, Item, ItemId, Scenario, ScenarioId};

use super::PHISHING_AWARENESS;

struct Email {
    id: &'static str,
    from: &'static str,
    subject: &'static str,
    body: &'static str,
    is_phishing: bool,
    explanation: &'static str,
}

const EMAILS: [Email; 5] = [
    Email {
        id: "email-1",
        from: "security@paypal-verification.net",
        subject: "URGENT: Your PayPal Account Has Been Suspended",
        body: "Dear Valued Customer,\n\n\
               We have detected suspicious activity on your PayPal account. Your account has \
               been temporarily suspended for your protection.\n\n\
               To restore access immediately, please click the link below and verify your \
               information:\n\n\
               https://paypal-secure-verification.net/login\n\n\
               Failure to verify within 24 hours will result in permanent account closure.",
        is_phishing: true,
        explanation: "Classic phishing: a look-alike domain, urgency and threats push the reader \
                      to a fake verification link.",
    },
    Email {
        id: "email-2",
        from: "noreply@company.com",
        subject: "Monthly Security Report - January 2024",
        body: "Hi Team,\n\n\
               Please find attached the monthly security report for January 2024.\n\n\
               Key highlights:\n\
               - 99.9% uptime maintained\n\
               - Zero security incidents\n\
               - Completed quarterly penetration testing",
        is_phishing: false,
        explanation: "A legitimate internal report: expected sender, realistic content and a \
                      professional tone.",
    },
    Email {
        id: "email-3",
        from: "winner@lottery-international.biz",
        subject: "CONGRATULATIONS! You have won $2,500,000 USD",
        body: "You have been selected as the winner of our International Lottery Program.\n\n\
               To claim your prize, please provide your full name, phone number, bank account \
               details and a copy of your ID.\n\n\
               Contact our claims agent immediately: claims@lottery-international.biz",
        is_phishing: true,
        explanation: "Advance fee fraud: a too-good-to-be-true prize used to harvest personal and \
                      financial information.",
    },
    Email {
        id: "email-4",
        from: "hr@company.com",
        subject: "Updated Employee Handbook Available",
        body: "Dear Team,\n\n\
               The updated Employee Handbook for 2024 is now available on the company \
               intranet.\n\n\
               Please review the handbook at your earliest convenience and acknowledge receipt \
               by replying to this email.",
        is_phishing: false,
        explanation: "Legitimate HR communication with an internal sender and no request for \
                      credentials.",
    },
    Email {
        id: "email-5",
        from: "support@microsoft-security.org",
        subject: "Microsoft Security Alert: Unusual Sign-in Activity",
        body: "We detected unusual sign-in activity on your Microsoft account from an unknown \
               location and device.\n\n\
               If this was not you, please secure your account immediately by clicking below:\n\n\
               https://microsoft-security.org/secure-account",
        is_phishing: true,
        explanation: "Impersonates Microsoft from a .org domain to steal credentials through a \
                      fake security link.",
    },
];

const POINTS_PER_EMAIL: u32 = 10;

pub(super) fn scenario() -> Result<Scenario, drill_core::Error> {
    let items = EMAILS
        .iter()
        .map(|email| -> Result<Item, drill_core::Error> {
            let prompt = format!(
                "From: {}\nSubject: {}\n\n{}\n\nIs this email a phishing attempt?",
                email.from, email.subject, email.body
            );
            Ok(
                Item::binary(ItemId::new(email.id)?, prompt, email.is_phishing, POINTS_PER_EMAIL)?
                    .with_explanation(email.explanation),
            )
        })
        .collect::<Result<Vec<_>, drill_core::Error>>()?;

    Ok(Scenario::new(
        ScenarioId::new(PHISHING_AWARENESS)?,
        super::module_id(PHISHING_AWARENESS)?,
        "Phishing Awareness",
        600,
        items,
    )?
    .with_description("Decide whether each email in the inbox is a phishing attempt.")
    .with_difficulty(Difficulty::Beginner))
}
