use anyhow::Result;
use async_trait::async_trait;
use mkusers::core::{
    AccountDirectory, AccountTools, FailureKind, Password, ProvisionRecord, Username,
};
use mkusers::{AccountProvisioner, ProvisionError};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ToolLog {
    created: Vec<String>,
    password_lines: Vec<String>,
    homes: Vec<String>,
}

/// 記錄所有呼叫的假工具；可指定哪些帳號建立或設密碼會失敗
#[derive(Clone, Default)]
struct FakeTools {
    log: Arc<Mutex<ToolLog>>,
    fail_create: HashSet<String>,
    fail_password: HashSet<String>,
}

impl FakeTools {
    fn created(&self) -> Vec<String> {
        self.log.lock().unwrap().created.clone()
    }

    fn password_lines(&self) -> Vec<String> {
        self.log.lock().unwrap().password_lines.clone()
    }

    fn homes(&self) -> Vec<String> {
        self.log.lock().unwrap().homes.clone()
    }
}

#[async_trait]
impl AccountTools for FakeTools {
    async fn create_account(&self, username: &Username) -> mkusers::Result<()> {
        if self.fail_create.contains(username.as_str()) {
            return Err(ProvisionError::AccountCreation {
                username: username.to_string(),
                reason: "useradd exited with exit status: 9".to_string(),
            });
        }
        self.log.lock().unwrap().created.push(username.to_string());
        Ok(())
    }

    async fn set_password(&self, username: &Username, password: &Password) -> mkusers::Result<()> {
        if self.fail_password.contains(username.as_str()) {
            return Err(ProvisionError::PasswordAssignment {
                username: username.to_string(),
                reason: "chpasswd exited with exit status: 1".to_string(),
            });
        }
        self.log
            .lock()
            .unwrap()
            .password_lines
            .push(format!("{}:{}", username, password));
        Ok(())
    }

    async fn ensure_home(&self, username: &Username) {
        self.log.lock().unwrap().homes.push(username.to_string());
    }
}

#[derive(Clone, Default)]
struct FakeDirectory {
    existing: HashSet<String>,
}

impl FakeDirectory {
    fn with(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            existing: names.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AccountDirectory for FakeDirectory {
    async fn existing_usernames(&self) -> mkusers::Result<HashSet<String>> {
        Ok(self.existing.clone())
    }
}

fn report_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out).lines().map(str::to_string).collect()
}

#[tokio::test]
async fn test_duplicate_names_get_distinct_usernames() -> Result<()> {
    let tools = FakeTools::default();
    let mut provisioner = AccountProvisioner::new(tools.clone(), FakeDirectory::default());
    let mut out = Vec::new();

    let records = provisioner
        .provision_from_names(["Ada Lovelace", "Ada Lovelace"], &mut out)
        .await?;

    assert_eq!(records.len(), 2);
    assert_eq!(tools.created(), vec!["adalo000", "adalo001"]);

    let eight = Regex::new(r"^[a-z]{5}[0-9]{3}$")?;
    assert!(tools.created().iter().all(|u| eight.is_match(u)));

    let lines = tools.password_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("adalo000:"));
    assert!(lines[1].starts_with("adalo001:"));
    assert_eq!(tools.homes(), vec!["adalo000", "adalo001"]);
    Ok(())
}

#[tokio::test]
async fn test_report_lines_match_password_records() -> Result<()> {
    let tools = FakeTools::default();
    let mut provisioner = AccountProvisioner::new(tools.clone(), FakeDirectory::default());
    let mut out = Vec::new();

    let records = provisioner
        .provision_from_names(["Grace Hopper"], &mut out)
        .await?;

    let lines = report_lines(&out);
    assert_eq!(lines.len(), 1);
    let report = Regex::new(r"^User (graho000) added with password ([1-9][0-9]{8})$")?;
    let caps = report.captures(&lines[0]).expect("success line");
    assert_eq!(
        tools.password_lines(),
        vec![format!("{}:{}", &caps[1], &caps[2])]
    );

    // 密碼只出現在報告行，回傳的紀錄不保留
    assert!(matches!(
        &records[0],
        ProvisionRecord::Created { username } if username.as_str() == "graho000"
    ));
    assert!(!format!("{:?}", records).contains(&caps[2]));
    Ok(())
}

#[tokio::test]
async fn test_blank_lines_are_skipped() -> Result<()> {
    let tools = FakeTools::default();
    let mut provisioner = AccountProvisioner::new(tools.clone(), FakeDirectory::default());
    let mut out = Vec::new();

    let records = provisioner
        .provision_from_names(["", "   ", "Cher", "\t"], &mut out)
        .await?;

    assert_eq!(records.len(), 1);
    assert_eq!(tools.created(), vec!["cherx000"]);
    assert_eq!(report_lines(&out).len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_existing_system_accounts_are_never_reused() -> Result<()> {
    let tools = FakeTools::default();
    let directory = FakeDirectory::with(["asaob000".to_string(), "asaob001".to_string()]);
    let mut provisioner = AccountProvisioner::new(tools.clone(), directory);
    let mut out = Vec::new();

    provisioner
        .provision_from_names([r#"Åsa ("Sally") Öberg"#], &mut out)
        .await?;

    assert_eq!(tools.created(), vec!["asaob002"]);
    Ok(())
}

#[tokio::test]
async fn test_exhausted_name_does_not_stop_batch() -> Result<()> {
    let tools = FakeTools::default();
    let directory = FakeDirectory::with((0..1000).map(|i| format!("cherx{:03}", i)));
    let mut provisioner = AccountProvisioner::new(tools.clone(), directory);
    let mut out = Vec::new();

    let records = provisioner
        .provision_from_names(["Ada Lovelace", "Cher", "Grace Hopper"], &mut out)
        .await?;

    assert_eq!(records.len(), 3);
    assert!(records[0].is_success());
    assert!(matches!(
        &records[1],
        ProvisionRecord::Failed {
            kind: FailureKind::Derivation,
            error: ProvisionError::UsernameSpaceExhausted { .. },
            ..
        }
    ));
    assert!(records[2].is_success());
    assert_eq!(tools.created(), vec!["adalo000", "graho000"]);

    let lines = report_lines(&out);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Cher"));
    Ok(())
}

#[tokio::test]
async fn test_creation_failure_skips_password_and_registry() -> Result<()> {
    let tools = FakeTools {
        fail_create: ["adalo000".to_string()].into_iter().collect(),
        ..FakeTools::default()
    };
    let mut provisioner = AccountProvisioner::new(tools.clone(), FakeDirectory::default());
    let mut out = Vec::new();

    let records = provisioner
        .provision_from_names(["Ada Lovelace", "Ada Lovelace"], &mut out)
        .await?;

    assert!(matches!(
        &records[0],
        ProvisionRecord::Failed {
            kind: FailureKind::AccountCreation,
            ..
        }
    ));
    // 失敗的名稱未登記，第二次仍嘗試 adalo000
    assert!(!records[1].is_success());
    assert!(tools.password_lines().is_empty());
    assert!(tools.homes().is_empty());
    assert!(provisioner.created_usernames().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_password_failure_keeps_account_registered() -> Result<()> {
    let tools = FakeTools {
        fail_password: ["adalo000".to_string()].into_iter().collect(),
        ..FakeTools::default()
    };
    let mut provisioner = AccountProvisioner::new(tools.clone(), FakeDirectory::default());
    let mut out = Vec::new();

    let records = provisioner
        .provision_from_names(["Ada Lovelace", "Ada Lovelace"], &mut out)
        .await?;

    assert!(matches!(
        &records[0],
        ProvisionRecord::Failed {
            kind: FailureKind::PasswordAssignment,
            ..
        }
    ));
    assert_eq!(records[0].username().map(Username::as_str), Some("adalo000"));
    assert!(records[1].is_success());
    assert_eq!(tools.created(), vec!["adalo000", "adalo001"]);
    assert_eq!(tools.homes(), vec!["adalo001"]);
    assert!(provisioner.created_usernames().contains("adalo000"));

    let lines = report_lines(&out);
    assert!(lines[0].contains("adalo000"));
    assert!(lines[1].starts_with("User adalo001 added with password "));
    Ok(())
}

#[tokio::test]
async fn test_single_and_empty_names_still_provisioned() -> Result<()> {
    let tools = FakeTools::default();
    let mut provisioner = AccountProvisioner::new(tools.clone(), FakeDirectory::default());
    let mut out = Vec::new();

    provisioner
        .provision_from_names(["Cher", "(nickname only)", "???"], &mut out)
        .await?;

    assert_eq!(tools.created(), vec!["cherx000", "userx000", "userx001"]);
    Ok(())
}
