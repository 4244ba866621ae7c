//! Interactive prompts that keep asking until the input is valid.

use super::ui;
use crate::core::intent::{GoalDisposition, parse_start_date, validate_goal_name};
use crate::core::model::Account;
use crate::core::orchestrator::AccountSelector;
use chrono::NaiveDate;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Reads lines until `parse` accepts one, printing each rejection.
fn prompt_until<T, E: Display>(
    prompt: &str,
    mut parse: impl FnMut(&str) -> Result<T, E>,
) -> io::Result<T> {
    let stdin = io::stdin();
    loop {
        print!("{prompt} ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a valid answer was given",
            ));
        }

        match parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }
}

/// Parses a 1-based menu number into a 0-based index below `available`.
pub fn parse_choice(input: &str, available: usize) -> Result<usize, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Please enter a number".to_string());
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=available).contains(&n) => Ok(n - 1),
        Ok(_) => Err(format!("Please enter a number between 1 and {available}")),
        Err(_) => Err("Please enter a valid number".to_string()),
    }
}

pub fn prompt_goal_disposition() -> io::Result<GoalDisposition> {
    println!("What would you like to do with your round-up?");
    println!("  1. Create a new savings goal");
    println!("  2. Add to an existing savings goal");
    let choice = prompt_until("Choose 1 or 2:", |input| parse_choice(input, 2))?;

    let prompt = if choice == 0 {
        "Name for the new savings goal:"
    } else {
        "Name of the existing savings goal:"
    };
    let name = prompt_until(prompt, validate_goal_name)?;

    Ok(if choice == 0 {
        GoalDisposition::NewGoal(name)
    } else {
        GoalDisposition::ExistingGoal(name)
    })
}

pub fn prompt_start_date(today: NaiveDate) -> io::Result<NaiveDate> {
    prompt_until("Start date of the week to round up (yyyy-mm-dd):", |input| {
        parse_start_date(input, today)
    })
}

/// Asks the user to pick an account from a numbered table.
#[derive(Default)]
pub struct TerminalAccountSelector;

impl AccountSelector for TerminalAccountSelector {
    fn select(&self, accounts: &[Account]) -> io::Result<usize> {
        println!("{}", ui::accounts_table(accounts));
        prompt_until(
            &format!("Select an account [1-{}]:", accounts.len()),
            |input| parse_choice(input, accounts.len()),
        )
    }
}
