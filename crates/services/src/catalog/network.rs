use drill_core::model::{Difficulty, Item, ItemId, Scenario, ScenarioId};

use super::NETWORK_SECURITY;

struct Challenge {
    id: &'static str,
    title: &'static str,
    setup: &'static str,
    question: &'static str,
    options: [&'static str; 4],
    correct: &'static str,
    explanation: &'static str,
    points: u32,
}

const CHALLENGES: [Challenge; 5] = [
    Challenge {
        id: "port-1",
        title: "Port Scan Analysis",
        setup: "Nmap scan report for target.company.com (192.168.1.100)\n\
                PORT     STATE  SERVICE\n\
                22/tcp   open   ssh\n\
                23/tcp   open   telnet\n\
                80/tcp   open   http\n\
                443/tcp  open   https\n\
                3389/tcp open   ms-wbt-server\n\
                5432/tcp open   postgresql",
        question: "Which open port presents the highest security risk?",
        options: [
            "Port 22 (SSH)",
            "Port 23 (Telnet)",
            "Port 80 (HTTP)",
            "Port 443 (HTTPS)",
        ],
        correct: "Port 23 (Telnet)",
        explanation: "Telnet sends everything in plaintext, passwords included.",
        points: 15,
    },
    Challenge {
        id: "firewall-1",
        title: "Firewall Rule Configuration",
        setup: "Your network is under a DDoS attack from addresses in 203.0.113.0/24. \
                Block it while keeping legitimate access.",
        question: "Which firewall rule would effectively block the attack?",
        options: [
            "DENY ALL FROM 203.0.113.0/24 TO ANY",
            "ALLOW ALL FROM 203.0.113.0/24 TO ANY",
            "DENY TCP FROM 203.0.113.0/24 TO PORT 80",
            "ALLOW TCP FROM ANY TO 203.0.113.0/24",
        ],
        correct: "DENY ALL FROM 203.0.113.0/24 TO ANY",
        explanation: "Denying all traffic from the attacking subnet leaves other sources untouched.",
        points: 20,
    },
    Challenge {
        id: "protocol-1",
        title: "Network Protocol Security",
        setup: "Sensitive financial data must travel between two offices over the internet, \
                encrypted and authenticated.",
        question: "Which protocol combination provides the best security?",
        options: ["HTTP + FTP", "HTTPS + SFTP", "Telnet + FTP", "HTTP + TFTP"],
        correct: "HTTPS + SFTP",
        explanation: "HTTPS encrypts web traffic and SFTP encrypts and authenticates file transfer.",
        points: 15,
    },
    Challenge {
        id: "vulnerability-1",
        title: "Network Vulnerability Assessment",
        setup: "WiFi network \"CompanyWiFi\" uses WEP encryption with password \"password123\". \
                The guest network is open and the admin panel is served over HTTP on the \
                default port.",
        question: "What is the most critical vulnerability?",
        options: [
            "Weak WiFi password",
            "WEP encryption usage",
            "Open guest network",
            "HTTP admin panel",
        ],
        correct: "WEP encryption usage",
        explanation: "WEP is broken and can be cracked in minutes; use WPA3 or at least WPA2.",
        points: 20,
    },
    Challenge {
        id: "port-2",
        title: "Service Identification",
        setup: "Nmap scan results:\n\
                21/tcp   open   ftp\n\
                25/tcp   open   smtp\n\
                53/tcp   open   domain\n\
                110/tcp  open   pop3\n\
                143/tcp  open   imap\n\
                993/tcp  open   imaps\n\
                995/tcp  open   pop3s",
        question: "Which service should be immediately secured or disabled?",
        options: ["FTP (21)", "SMTP (25)", "DNS (53)", "IMAPS (993)"],
        correct: "FTP (21)",
        explanation: "Plain FTP sends credentials and data in cleartext; replace it with SFTP or FTPS.",
        points: 15,
    },
];

pub(super) fn scenario() -> Result<Scenario, drill_core::Error> {
    let items = CHALLENGES
        .iter()
        .map(|c| -> Result<Item, drill_core::Error> {
            let prompt = format!("{}\n\n{}\n\n{}", c.title, c.setup, c.question);
            Ok(
                Item::multiple_choice(ItemId::new(c.id)?, prompt, c.options, c.correct, c.points)?
                    .with_explanation(c.explanation),
            )
        })
        .collect::<Result<Vec<_>, drill_core::Error>>()?;

    Ok(Scenario::new(
        ScenarioId::new(NETWORK_SECURITY)?,
        super::module_id(NETWORK_SECURITY)?,
        "Network Security",
        1500,
        items,
    )?
    .with_description("Analyse scans, firewall rules and configurations.")
    .with_difficulty(Difficulty::Intermediate))
}
