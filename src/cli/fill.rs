use crate::models::{EventConfig, FormStep, FormUpdate, RsvpConfig};
use crate::session::{AdvanceOutcome, RsvpSession, SubmitOutcome};
use crate::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BACK: &str = "Voltar";

/// Run the interactive wizard until the guest reaches the thank-you page
/// or gives up on the welcome page.
pub async fn run(config: &RsvpConfig, endpoint: Option<&str>, website: Option<String>) -> Result<()> {
    let session = super::build_session(config, endpoint)?;
    if let Some(value) = website {
        session.update(FormUpdate::Honeypot(value));
    }

    print_header(&config.event);

    loop {
        let outcome = match session.step() {
            FormStep::Welcome => {
                if !welcome(&config.event)? {
                    println!("{}", "Até breve!".bright_black());
                    return Ok(());
                }
                session.advance().await
            }
            FormStep::Details => {
                details(&session)?;
                session.advance().await
            }
            FormStep::Presence => {
                if !presence(&session)? {
                    session.back();
                    continue;
                }
                with_spinner(&session, session.advance()).await
            }
            FormStep::Diet => {
                if !diet(&session)? {
                    session.back();
                    continue;
                }
                with_spinner(&session, session.advance()).await
            }
            FormStep::ThankYou => return Ok(()),
        };

        if let Some(attending) = report(outcome) {
            print_thank_you(&config.event, attending);
            return Ok(());
        }
    }
}

fn print_header(event: &EventConfig) {
    println!();
    println!("{}", event.couple.cyan().bold());
    println!("{}", event.date.to_uppercase().bright_black());
    println!();
}

fn print_heading(step: FormStep) {
    println!();
    println!("{}", step.heading().cyan().bold());
}

fn welcome(event: &EventConfig) -> Result<bool> {
    println!("{}", event.welcome);
    println!();
    println!("Um abraço e um beijinho grande,");
    println!("{}", event.couple.cyan());
    println!();

    Ok(Confirm::new()
        .with_prompt(FormStep::Welcome.heading())
        .default(true)
        .interact()?)
}

fn details(session: &RsvpSession) -> Result<()> {
    print_heading(FormStep::Details);
    let form = session.form();

    let name: String = Input::new()
        .with_prompt("Nome Completo")
        .with_initial_text(form.name)
        .allow_empty(true)
        .interact_text()?;
    session.update(FormUpdate::Name(name));

    let email: String = Input::new()
        .with_prompt("Email")
        .with_initial_text(form.email)
        .allow_empty(true)
        .interact_text()?;
    session.update(FormUpdate::Email(email));

    Ok(())
}

/// Returns false when the guest chose to go back
fn presence(session: &RsvpSession) -> Result<bool> {
    print_heading(FormStep::Presence);
    let form = session.form();

    let choice = Select::new()
        .items(&["Sim", "Não", BACK])
        .default(if form.attending { 0 } else { 1 })
        .interact()?;

    match choice {
        0 => session.update(FormUpdate::Attending(true)),
        1 => session.update(FormUpdate::Attending(false)),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Returns false when the guest chose to go back
fn diet(session: &RsvpSession) -> Result<bool> {
    print_heading(FormStep::Diet);
    let form = session.form();

    let choice = Select::new()
        .with_prompt("Tens alguma alergia ou restrição que devamos saber?")
        .items(&["Sim", "Não", BACK])
        .default(if form.has_dietary_restriction { 0 } else { 1 })
        .interact()?;

    match choice {
        0 => {
            session.update(FormUpdate::DietaryRestriction(true));
            let details: String = Input::new()
                .with_prompt("Quais? (ex: Vegetariano, Sem Glúten, Alergia a Marisco)")
                .with_initial_text(form.dietary_details)
                .allow_empty(true)
                .interact_text()?;
            session.update(FormUpdate::DietaryDetails(details));
        }
        1 => session.update(FormUpdate::DietaryRestriction(false)),
        _ => return Ok(false),
    }
    Ok(true)
}

async fn with_spinner<F>(session: &RsvpSession, fut: F) -> F::Output
where
    F: std::future::Future,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    if session.step() == FormStep::Diet || !session.form().attending {
        pb.set_message("A enviar...");
    }

    let output = fut.await;
    pb.finish_and_clear();
    output
}

/// Print whatever the guest should see. Returns the attendance answer once sent.
fn report(outcome: AdvanceOutcome) -> Option<bool> {
    match outcome {
        AdvanceOutcome::Moved(_) | AdvanceOutcome::Finished => None,
        AdvanceOutcome::Blocked(errors) => {
            for error in errors {
                println!("   {} {}", "✗".red(), error.to_string().red());
            }
            None
        }
        AdvanceOutcome::Submitted(SubmitOutcome::Sent { attending }) => Some(attending),
        AdvanceOutcome::Submitted(outcome) => {
            if let Some(message) = outcome.user_message() {
                let message = match outcome {
                    SubmitOutcome::TransportFailed(_) => message.red(),
                    _ => message.yellow(),
                };
                println!("   {}", message);
            }
            None
        }
    }
}

/// Closing message, which depends on the answer given
pub fn thank_you_message(attending: bool) -> &'static str {
    if attending {
        "Ficamos muito felizes em saber que vais estar connosco!\nGuardámos o teu lugar com muito carinho."
    } else {
        "Sentiremos a tua falta, mas agradecemos por nos avisares.\nEsperamos ver-te em breve noutra ocasião!"
    }
}

fn print_thank_you(event: &EventConfig, attending: bool) {
    print_heading(FormStep::ThankYou);
    println!("{}", "✅".green());
    println!("{}", thank_you_message(attending));
    println!();
    println!("{}", event.couple.cyan().bold());
}
