//! Log-analysis scenarios: the learner reads an evidence log and answers questions about it.

use drill_core::model::{
    Difficulty, EvidenceEntry, Item, ItemId, RevealPolicy, Scenario, ScenarioId,
};

use super::THREAT_HUNTING;

pub const SSH_BRUTE_FORCE: &str = "ssh-brute-force";
pub const INSIDER_THREAT: &str = "insider-threat";
pub const DNS_TUNNELING: &str = "dns-tunneling";

fn q(n: u8) -> Result<ItemId, drill_core::Error> {
    Ok(ItemId::new(format!("q{n}"))?)
}

fn evidence_ids(evidence: &[EvidenceEntry]) -> Vec<String> {
    evidence.iter().map(|e| e.id.clone()).collect()
}

fn build(
    id: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    time_limit_seconds: u32,
    evidence: Vec<EvidenceEntry>,
    items: Vec<Item>,
) -> Result<Scenario, drill_core::Error> {
    Ok(Scenario::new(
        ScenarioId::new(id)?,
        super::module_id(THREAT_HUNTING)?,
        title,
        time_limit_seconds,
        items,
    )?
    .with_description(description)
    .with_difficulty(difficulty)
    .with_reveal(RevealPolicy::AtEnd)
    .with_evidence(evidence))
}

pub(super) fn ssh_brute_force() -> Result<Scenario, drill_core::Error> {
    let evidence = vec![
        EvidenceEntry::new(
            "ssh-1",
            "2024-01-15 08:30:15",
            "sshd[1234]",
            "INFO",
            "Accepted password for alice from 192.168.1.100 port 22 ssh2",
        ),
        EvidenceEntry::new(
            "ssh-2",
            "2024-01-15 14:22:01",
            "sshd[2341]",
            "INFO",
            "Failed password for root from 203.0.113.42 port 22 ssh2",
        ),
        EvidenceEntry::new(
            "ssh-3",
            "2024-01-15 14:22:03",
            "sshd[2342]",
            "INFO",
            "Failed password for admin from 203.0.113.42 port 22 ssh2",
        ),
        EvidenceEntry::new(
            "ssh-4",
            "2024-01-15 14:22:05",
            "sshd[2343]",
            "INFO",
            "Failed password for user from 203.0.113.42 port 22 ssh2",
        ),
        EvidenceEntry::new(
            "ssh-5",
            "2024-01-15 14:22:07",
            "sshd[2344]",
            "INFO",
            "Failed password for test from 203.0.113.42 port 22 ssh2",
        ),
        EvidenceEntry::new(
            "ssh-6",
            "2024-01-15 14:22:09",
            "sshd[2345]",
            "INFO",
            "Failed password for guest from 203.0.113.42 port 22 ssh2",
        ),
        EvidenceEntry::new(
            "ssh-7",
            "2024-01-15 15:45:22",
            "sshd[3456]",
            "INFO",
            "Accepted password for bob from 192.168.1.101 port 22 ssh2",
        ),
    ];

    let items = vec![
        Item::multiple_choice(
            q(1)?,
            "Which IP address is conducting the brute force attack?",
            ["192.168.1.100", "203.0.113.42", "192.168.1.101", "127.0.0.1"],
            "203.0.113.42",
            10,
        )?
        .with_explanation("203.0.113.42 appears in every failed login, seconds apart."),
        Item::multi_select(
            q(2)?,
            "Select ALL log entries that are part of the brute force attack:",
            evidence_ids(&evidence),
            ["ssh-2", "ssh-3", "ssh-4", "ssh-5", "ssh-6"],
            15,
        )?
        .with_explanation("Every failed login from 203.0.113.42 between 14:22:01 and 14:22:09."),
        Item::multiple_choice(
            q(3)?,
            "What type of attack pattern is this?",
            [
                "Password Spraying",
                "Credential Stuffing",
                "Dictionary Attack",
                "Rainbow Table Attack",
            ],
            "Dictionary Attack",
            10,
        )?
        .with_explanation("Common usernames (root, admin, user, test, guest) are tried in turn."),
        Item::free_text(
            q(4)?,
            "What is the primary indicator that this is an automated attack? (one word)",
            "timing",
            5,
        )?
        .with_explanation("Attempts arrive every two seconds, far faster than a person types."),
    ];

    build(
        SSH_BRUTE_FORCE,
        "SSH Brute Force Attack",
        "Analyze SSH authentication logs to identify a brute force attack pattern.",
        Difficulty::Beginner,
        300,
        evidence,
        items,
    )
}

pub(super) fn insider_threat() -> Result<Scenario, drill_core::Error> {
    let evidence = vec![
        EvidenceEntry::new(
            "insider-1",
            "2024-01-14 09:15:22",
            "fileserver[1001]",
            "INFO",
            "User jsmith accessed file: /shares/projects/quarterly-report.docx",
        ),
        EvidenceEntry::new(
            "insider-2",
            "2024-01-14 17:30:45",
            "auth[2001]",
            "INFO",
            "User jsmith logged out from workstation WS-101",
        ),
        EvidenceEntry::new(
            "insider-3",
            "2024-01-14 23:45:12",
            "auth[2002]",
            "INFO",
            "User jsmith logged in from workstation WS-101",
        ),
        EvidenceEntry::new(
            "insider-4",
            "2024-01-14 23:47:33",
            "fileserver[1002]",
            "INFO",
            "User jsmith accessed file: /shares/hr/employee-database.xlsx",
        ),
        EvidenceEntry::new(
            "insider-5",
            "2024-01-14 23:52:18",
            "fileserver[1003]",
            "INFO",
            "User jsmith copied 847MB from /shares/customer-data/ to /users/jsmith/temp/",
        ),
        EvidenceEntry::new(
            "insider-6",
            "2024-01-15 00:15:44",
            "email[3001]",
            "WARN",
            "User jsmith sent email with 3 attachments (245MB) to external address: personal@gmail.com",
        ),
        EvidenceEntry::new(
            "insider-7",
            "2024-01-15 08:30:15",
            "auth[2003]",
            "INFO",
            "User alice logged in from workstation WS-205",
        ),
    ];

    let items = vec![
        Item::multiple_choice(
            q(1)?,
            "What time did the suspicious activity begin?",
            ["09:15:22", "17:30:45", "23:45:12", "00:15:44"],
            "23:45:12",
            5,
        )?
        .with_explanation("The after-hours login at 23:45:12 starts the chain."),
        Item::multi_select(
            q(2)?,
            "Select ALL entries showing suspicious behavior:",
            evidence_ids(&evidence),
            ["insider-3", "insider-4", "insider-5", "insider-6"],
            20,
        )?
        .with_explanation("Everything from the late login through the external email."),
        Item::multiple_choice(
            q(3)?,
            "What is the most serious indicator of data theft?",
            [
                "After-hours login",
                "HR database access",
                "Large file copying",
                "Email to personal account",
            ],
            "Email to personal account",
            15,
        )?
        .with_explanation("Large attachments sent to a personal mailbox are clear exfiltration."),
        Item::free_text(
            q(4)?,
            "How much data was copied to the personal directory? (include units)",
            "847MB",
            5,
        )?
        .with_explanation("847MB of customer data was staged in the personal temp directory."),
    ];

    build(
        INSIDER_THREAT,
        "Insider Threat - Suspicious Data Access",
        "Identify unusual employee behavior indicating potential data theft.",
        Difficulty::Intermediate,
        450,
        evidence,
        items,
    )
}

pub(super) fn dns_tunneling() -> Result<Scenario, drill_core::Error> {
    let evidence = vec![
        EvidenceEntry::new(
            "dns-1",
            "2024-01-15 10:15:22",
            "dns[4001]",
            "INFO",
            "Query: www.google.com A record from 10.0.1.50",
        ),
        EvidenceEntry::new(
            "dns-2",
            "2024-01-15 10:16:33",
            "dns[4002]",
            "INFO",
            "Query: 4d7a6c8b9e.tunnel.example.com TXT record from 10.0.1.75",
        ),
        EvidenceEntry::new(
            "dns-3",
            "2024-01-15 10:16:35",
            "dns[4003]",
            "INFO",
            "Query: 7f3e9a2d1c.tunnel.example.com TXT record from 10.0.1.75",
        ),
        EvidenceEntry::new(
            "dns-4",
            "2024-01-15 10:16:37",
            "dns[4004]",
            "INFO",
            "Query: b8f4c6e2a9.tunnel.example.com TXT record from 10.0.1.75",
        ),
        EvidenceEntry::new(
            "dns-5",
            "2024-01-15 10:17:45",
            "dns[4005]",
            "INFO",
            "Query: mail.company.com MX record from 10.0.1.30",
        ),
        EvidenceEntry::new(
            "dns-6",
            "2024-01-15 10:18:12",
            "dns[4006]",
            "INFO",
            "Query: 3c8f7b4e6d.tunnel.example.com TXT record from 10.0.1.75",
        ),
    ];

    let items = vec![
        Item::multiple_choice(
            q(1)?,
            "Which DNS record type is being abused for tunneling?",
            ["A record", "MX record", "TXT record", "CNAME record"],
            "TXT record",
            10,
        )?
        .with_explanation("TXT records carry arbitrary text, ideal for smuggling data."),
        Item::multiple_choice(
            q(2)?,
            "Which IP address is conducting the DNS tunneling?",
            ["10.0.1.50", "10.0.1.75", "10.0.1.30", "10.0.1.100"],
            "10.0.1.75",
            10,
        )?
        .with_explanation("10.0.1.75 sends every suspicious TXT query."),
        Item::multi_select(
            q(3)?,
            "Select ALL DNS tunneling attempts:",
            evidence_ids(&evidence),
            ["dns-2", "dns-3", "dns-4", "dns-6"],
            20,
        )?
        .with_explanation("Each TXT query to an encoded subdomain of tunnel.example.com."),
        Item::free_text(
            q(4)?,
            "What domain is being used for the covert channel?",
            "tunnel.example.com",
            10,
        )?
        .with_explanation("tunnel.example.com receives the encoded subdomains."),
    ];

    build(
        DNS_TUNNELING,
        "DNS Tunneling - Covert Communication",
        "Detect DNS tunneling used for covert data exfiltration.",
        Difficulty::Advanced,
        600,
        evidence,
        items,
    )
}
