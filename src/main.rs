use std::io::{stdin, ErrorKind};

use clap::Parser;
use role_stresscheck::{evaluate_stress, get_questions, Error};

#[derive(Parser)]
struct Args {
    /// student, working_women or housewife
    role: String,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let questions = get_questions(&args.role)?;
    let mut buffer = String::new();
    let mut answers = Vec::with_capacity(questions.len());

    for question in &questions {
        println!("{}. {}", question.id, question.prompt);
        for (index, label) in question.choices.iter().enumerate() {
            print!("  {} => {}", index, label);
        }
        loop {
            println!();
            buffer.clear();
            if stdin().read_line(&mut buffer)? == 0 {
                return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into());
            }
            match read_choice(buffer.trim(), question.choices.len()) {
                Some(choice) => {
                    answers.push(choice);
                    break;
                }
                None => print!(
                    "Please answer with a number from 0 to {}.",
                    question.choices.len() - 1
                ),
            }
        }
        println!();
    }

    let result = evaluate_stress(&args.role, &answers)?;
    println!("Score: {} / {}", result.total_score, result.max_score);
    println!("Stress level: {}", result.category);
    println!("{}", result.advisory);
    Ok(())
}

fn read_choice(value: &str, choices: usize) -> Option<i64> {
    value
        .parse::<usize>()
        .ok()
        .filter(|&choice| choice < choices)
        .and_then(|choice| i64::try_from(choice).ok())
}
