//! CLI commands

pub mod form;
pub mod students;

use colored::Colorize;
use enroll_types::Student;

/// Print one student as a labelled block
pub fn print_student(student: &Student) {
    println!("  {:<16} {}", "Roll No:".dimmed(), student.roll_no.bold());
    println!("  {:<16} {}", "Full Name:".dimmed(), student.full_name);
    println!("  {:<16} {}", "Class:".dimmed(), student.class);
    println!("  {:<16} {}", "Birth Date:".dimmed(), student.birth_date);
    println!("  {:<16} {}", "Address:".dimmed(), student.address);
    println!(
        "  {:<16} {}",
        "Enrolled:".dimmed(),
        student.enrollment_date
    );
}

/// Print students as an aligned table
pub fn print_table(students: &[Student]) {
    println!(
        "{}",
        format!(
            "{:<10} {:<24} {:<8} {:<12} {:<12} {}",
            "ROLL NO", "NAME", "CLASS", "BORN", "ENROLLED", "ADDRESS"
        )
        .bold()
    );
    for s in students {
        println!(
            "{:<10} {:<24} {:<8} {:<12} {:<12} {}",
            s.roll_no, s.full_name, s.class, s.birth_date, s.enrollment_date, s.address
        );
    }
}
