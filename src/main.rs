use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use timetable_client::{ClientConfig, HttpSchedulingService};
use timetable_core::models::{ClockTime, Day, EntryId, EntryUpdate, Scope, SlotId};
use timetable_core::{ScheduleResult, Timetable};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod render;

#[derive(Parser)]
#[command(name = "timetable", version, about = "Weekly timetable grid for a class and section")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the weekly grid of a class and section
    Show { class_name: String, section: String },
    /// List the time slots in row order
    Slots,
    /// Add a time slot, e.g. `add-slot 09:00 09:45`
    AddSlot { start: ClockTime, end: ClockTime },
    /// Change the interval of a time slot
    EditSlot {
        id: String,
        start: ClockTime,
        end: ClockTime,
    },
    /// Delete a time slot; its entries stay but leave the grid
    RemoveSlot { id: String },
    /// Schedule a subject and teacher into a cell
    AddEntry {
        class_name: String,
        section: String,
        slot_id: String,
        day: Day,
        subject: String,
        teacher_id: String,
        #[arg(long)]
        room: Option<String>,
    },
    /// Change fields of an existing entry
    UpdateEntry {
        class_name: String,
        section: String,
        id: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long)]
        day: Option<Day>,
        #[arg(long)]
        slot: Option<String>,
        #[arg(long)]
        room: Option<String>,
    },
    /// Delete an entry
    DeleteEntry {
        class_name: String,
        section: String,
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    // Initialize logging; stdout is reserved for the grid
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let service = HttpSchedulingService::from_config(&config)?;
    info!("Using scheduling service at {}", service.base_url());

    let mut timetable = Timetable::new(service).with_days(config.days.clone());
    timetable.refresh_slots().await?;

    let outcome = match cli.command {
        Command::Show {
            class_name,
            section,
        } => {
            open(&mut timetable, &class_name, &section).await?;
            print!("{}", render::grid(&timetable.grid(), timetable.teachers()));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Slots => {
            print!("{}", render::slots(timetable.registry().slots()));
            return Ok(ExitCode::SUCCESS);
        }
        Command::AddSlot { start, end } => timetable
            .add_slot(start, end)
            .await
            .map(|slot| format!("Added {} ({})", slot.label, slot.id)),
        Command::EditSlot { id, start, end } => timetable
            .edit_slot(&SlotId::from(id.as_str()), start, end)
            .await
            .map(|slot| format!("Slot {} is now {} ({})", id, slot.label, slot.id)),
        Command::RemoveSlot { id } => timetable
            .remove_slot(&SlotId::from(id.as_str()))
            .await
            .map(|slot| format!("Removed {}", slot.label)),
        Command::AddEntry {
            class_name,
            section,
            slot_id,
            day,
            subject,
            teacher_id,
            room,
        } => {
            open(&mut timetable, &class_name, &section).await?;
            timetable
                .create_entry(
                    &SlotId::from(slot_id.as_str()),
                    day,
                    &subject,
                    &teacher_id,
                    room.as_deref(),
                )
                .await
                .map(|entry| format!("Created entry {}", entry.id))
        }
        Command::UpdateEntry {
            class_name,
            section,
            id,
            subject,
            teacher,
            day,
            slot,
            room,
        } => {
            open(&mut timetable, &class_name, &section).await?;
            let update = EntryUpdate {
                subject_name: subject,
                teacher_id: teacher,
                day,
                slot_id: slot.as_deref().map(SlotId::from),
                room_number: room.map(Some),
            };
            timetable
                .update_entry(&EntryId::from(id), update)
                .await
                .map(|entry| format!("Updated entry {}", entry.id))
        }
        Command::DeleteEntry {
            class_name,
            section,
            id,
        } => {
            open(&mut timetable, &class_name, &section).await?;
            timetable
                .delete_entry(&EntryId::from(id))
                .await
                .map(|entry| format!("Deleted entry {}", entry.id))
        }
    };

    Ok(notify(outcome))
}

/// Loads teachers and the entries of one class/section.
async fn open(
    timetable: &mut Timetable<HttpSchedulingService>,
    class_name: &str,
    section: &str,
) -> Result<()> {
    let scope = Scope::new(class_name, section)?;
    timetable.refresh_teachers().await?;
    timetable.select(scope).await?;
    Ok(())
}

fn notify(outcome: ScheduleResult<String>) -> ExitCode {
    match outcome {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
