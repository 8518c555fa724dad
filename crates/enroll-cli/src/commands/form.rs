//! Interactive enrollment form
//!
//! Mirrors the web form: only the roll number is editable at first. Once it
//! is entered the remaining fields open up, pre-filled from the existing
//! record when the student is already enrolled (edit mode) and blank
//! otherwise (create mode). The enrollment date is only editable in edit mode.

use super::print_student;
use crate::api::Client;
use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input};
use enroll_types::{is_valid_date, NewStudent, Student, StudentChanges};

fn required(value: &String) -> std::result::Result<(), &'static str> {
    if value.trim().is_empty() {
        Err("This field is required")
    } else {
        Ok(())
    }
}

fn date(value: &String) -> std::result::Result<(), &'static str> {
    if is_valid_date(value) {
        Ok(())
    } else {
        Err("Use the YYYY-MM-DD format")
    }
}

fn ask(prompt: &str, current: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(required);
    if let Some(current) = current {
        input = input.default(current.to_string());
    }
    Ok(input.interact_text()?.trim().to_string())
}

fn ask_date(prompt: &str, current: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt(format!("{} (YYYY-MM-DD)", prompt))
        .validate_with(date);
    if let Some(current) = current {
        input = input.default(current.to_string());
    }
    Ok(input.interact_text()?.trim().to_string())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}

pub async fn run(client: &Client) -> Result<()> {
    println!("{}", "📝 Student Enrollment Form".blue().bold());
    println!(
        "{}",
        "Enter a roll number; enrolled students open for editing.".dimmed()
    );
    println!();

    let roll_no = ask("Roll No", None)?;

    if !client.student_exists(&roll_no).await? {
        return create(client, roll_no).await;
    }

    match client.get_student(&roll_no).await? {
        Some(existing) => edit(client, existing).await,
        None => anyhow::bail!("Student {} was removed while the form was open", roll_no),
    }
}

async fn create(client: &Client, roll_no: String) -> Result<()> {
    println!("{}", format!("New student {}", roll_no).cyan());

    let draft = NewStudent {
        roll_no,
        full_name: ask("Full Name", None)?,
        class: ask("Class", None)?,
        birth_date: ask("Birth Date", None)?,
        address: ask("Address", None)?,
    };

    if !confirm("Save this student?")? {
        println!("Form reset.");
        return Ok(());
    }

    let student = client.create_student(&draft).await?;
    println!();
    println!("{}", "✓ Student enrolled".green().bold());
    print_student(&student);
    Ok(())
}

async fn edit(client: &Client, existing: Student) -> Result<()> {
    println!("{}", format!("Student {} found", existing.roll_no).cyan());
    print_student(&existing);
    println!();

    let changes = StudentChanges {
        full_name: ask("Full Name", Some(&existing.full_name))?,
        class: ask("Class", Some(&existing.class))?,
        birth_date: ask("Birth Date", Some(&existing.birth_date))?,
        address: ask("Address", Some(&existing.address))?,
        enrollment_date: ask_date("Enrollment Date", Some(&existing.enrollment_date))?,
    };

    if changes == existing.changes() {
        println!("No changes.");
        return Ok(());
    }
    if !confirm("Update this student?")? {
        println!("Form reset.");
        return Ok(());
    }

    let student = client.update_student(&existing.roll_no, &changes).await?;
    println!();
    println!("{}", "✓ Student updated".green().bold());
    print_student(&student);
    Ok(())
}
