//! Non-interactive student commands

use super::{print_student, print_table};
use crate::api::Client;
use anyhow::Result;
use colored::Colorize;
use enroll_types::{NewStudent, Student, StudentChanges};

/// Fields given on the command line for `update`; `None` keeps the current value
#[derive(Debug, Default)]
pub struct UpdateOptions {
    pub full_name: Option<String>,
    pub class: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub enrollment_date: Option<String>,
}

impl UpdateOptions {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.class.is_none()
            && self.birth_date.is_none()
            && self.address.is_none()
            && self.enrollment_date.is_none()
    }

    /// Overlay the given fields on an existing record
    pub fn merge(self, existing: &Student) -> StudentChanges {
        let current = existing.changes();
        StudentChanges {
            full_name: self.full_name.unwrap_or(current.full_name),
            class: self.class.unwrap_or(current.class),
            birth_date: self.birth_date.unwrap_or(current.birth_date),
            address: self.address.unwrap_or(current.address),
            enrollment_date: self.enrollment_date.unwrap_or(current.enrollment_date),
        }
    }
}

pub async fn list(client: &Client) -> Result<()> {
    let students = client.list_students().await?;
    if students.is_empty() {
        println!("{}", "No students enrolled yet.".yellow());
        return Ok(());
    }
    print_table(&students);
    println!();
    println!("{} student(s)", students.len());
    Ok(())
}

pub async fn show(client: &Client, roll_no: &str) -> Result<()> {
    match client.get_student(roll_no).await? {
        Some(student) => print_student(&student),
        None => anyhow::bail!("Student {} not found", roll_no),
    }
    Ok(())
}

pub async fn add(client: &Client, draft: NewStudent) -> Result<()> {
    let draft = draft.normalize();
    draft.validate()?;

    let student = client.create_student(&draft).await?;
    println!("{}", format!("✓ Enrolled student {}", student.roll_no).green());
    print_student(&student);
    Ok(())
}

pub async fn update(client: &Client, roll_no: &str, options: UpdateOptions) -> Result<()> {
    if options.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one field");
    }

    let existing = client
        .get_student(roll_no)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Student {} not found", roll_no))?;
    let changes = options.merge(&existing).normalize();
    changes.validate()?;

    let student = client.update_student(roll_no, &changes).await?;
    println!("{}", format!("✓ Updated student {}", student.roll_no).green());
    print_student(&student);
    Ok(())
}

pub async fn delete(client: &Client, roll_no: &str, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete student {}?", roll_no))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let message = client.delete_student(roll_no).await?;
    println!("{}", format!("✓ {}", message).green());
    Ok(())
}

pub async fn stats(client: &Client) -> Result<()> {
    let count = client.count_students().await?;
    println!("{} {}", "Enrolled students:".bold(), count);
    println!("{} {}", "Server:".dimmed(), client.base_url());
    Ok(())
}
