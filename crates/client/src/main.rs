//! lessonbook-client CLI entry point.

use clap::Parser;

use lessonbook_client::cli::data::{ExportArgs, ImportArgs};
use lessonbook_client::cli::notes::NotesAction;
use lessonbook_client::cli::settings::{InstrumentsAction, SettingsAction};
use lessonbook_client::cli::songs::{SongFields, SongsAction};
use lessonbook_client::cli::students::StudentsAction;
use lessonbook_client::cli::{Cli, Commands};
use lessonbook_client::output::{format_output, pretty, render};
use lessonbook_client::LessonbookClient;
use lessonbook_core::lesson::{
    CreateNoteRequest, CreateSongRequest, CreateStudentRequest, ImportBundle,
    RecordTeachingRequest, UpdateNoteRequest, UpdateSettingsRequest, UpdateSongRequest,
    UpdateStudentRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = LessonbookClient::new(&cli.base_url);
    let format = cli.format;

    match cli.command {
        Commands::Students(cmd) => match cmd.action {
            StudentsAction::List => {
                let students = client.list_students().await?;
                println!("{}", render(&students, format, |s| pretty::format_students(s)));
            }
            StudentsAction::Create {
                name,
                instrument,
                grade,
                day,
                time,
                contact,
                current_material,
            } => {
                let mut request = CreateStudentRequest::new(name, instrument, grade, day, time);
                request.contact = contact;
                request.current_material = current_material;
                let student = client.create_student(&request).await?;
                println!(
                    "{}",
                    render(&student, format, |s| format!(
                        "Created:\n{}",
                        pretty::format_student(s)
                    ))
                );
            }
            StudentsAction::Get { id } => {
                let student = client.get_student(id).await?;
                println!("{}", render(&student, format, pretty::format_student));
            }
            StudentsAction::Update {
                id,
                name,
                instrument,
                grade,
                day,
                time,
                contact,
                current_material,
                attendance,
            } => {
                let request = UpdateStudentRequest {
                    name,
                    instrument,
                    grade,
                    day,
                    time,
                    contact,
                    current_material,
                    attendance,
                    last_active: None,
                };
                let student = client.update_student(id, &request).await?;
                println!(
                    "{}",
                    render(&student, format, |s| format!(
                        "Updated:\n{}",
                        pretty::format_student(s)
                    ))
                );
            }
            StudentsAction::Delete { id } => {
                client.delete_student(id).await?;
                if !cli.quiet {
                    println!("Deleted student {}", id);
                }
            }
        },
        Commands::Notes(cmd) => match cmd.action {
            NotesAction::List { student_id } => {
                let notes = client.list_notes(student_id).await?;
                println!("{}", render(&notes, format, |n| pretty::format_notes(n)));
            }
            NotesAction::Create {
                student_id,
                content,
                date,
            } => {
                let mut request = CreateNoteRequest::new(content);
                request.date = date;
                let note = client.create_note(student_id, &request).await?;
                println!("{}", render(&note, format, pretty::format_note));
            }
            NotesAction::Get {
                student_id,
                note_id,
            } => {
                let note = client.get_note(student_id, note_id).await?;
                println!("{}", render(&note, format, pretty::format_note));
            }
            NotesAction::Update {
                student_id,
                note_id,
                content,
                date,
            } => {
                let request = UpdateNoteRequest { content, date };
                let note = client.update_note(student_id, note_id, &request).await?;
                println!("{}", render(&note, format, pretty::format_note));
            }
            NotesAction::Delete {
                student_id,
                note_id,
            } => {
                client.delete_note(student_id, note_id).await?;
                if !cli.quiet {
                    println!("Deleted note {}", note_id);
                }
            }
        },
        Commands::Songs(cmd) => match cmd.action {
            SongsAction::List => {
                let songs = client.list_songs().await?;
                println!("{}", render(&songs, format, |s| pretty::format_songs(s)));
            }
            SongsAction::Create {
                title,
                artist,
                fields,
            } => {
                let request = song_create_request(title, artist, fields);
                let song = client.create_song(&request).await?;
                println!("{}", render(&song, format, pretty::format_song));
            }
            SongsAction::Get { id } => {
                let song = client.get_song(id).await?;
                println!("{}", render(&song, format, pretty::format_song));
            }
            SongsAction::Update {
                id,
                title,
                artist,
                fields,
            } => {
                let request = UpdateSongRequest {
                    title,
                    artist,
                    key_letter: fields.key_letter,
                    key_modifier: fields.key_modifier,
                    key_mode: fields.key_mode,
                    bpm: fields.bpm,
                    youtube_url: fields.youtube_url,
                };
                let song = client.update_song(id, &request).await?;
                println!("{}", render(&song, format, pretty::format_song));
            }
            SongsAction::Delete { id } => {
                client.delete_song(id).await?;
                if !cli.quiet {
                    println!("Deleted song {}", id);
                }
            }
            SongsAction::Teach {
                song_id,
                student_id,
                date,
                lesson_id,
            } => {
                let mut request = RecordTeachingRequest::new(song_id, student_id);
                request.taught_date = date;
                request.lesson_id = lesson_id;
                let recorded = client.record_teaching(&request).await?;
                println!(
                    "{}",
                    render(&recorded, format, |r| pretty::format_song(&r.song))
                );
            }
            SongsAction::Teachings {
                student_id,
                song_id,
            } => {
                let teachings = client.list_teachings(student_id, song_id).await?;
                println!(
                    "{}",
                    render(&teachings, format, |t| pretty::format_teachings(t))
                );
            }
        },
        Commands::Settings(cmd) => match cmd.action {
            SettingsAction::Get => {
                let settings = client.get_settings().await?;
                println!("{}", render(&settings, format, pretty::format_settings));
            }
            SettingsAction::Set { json } => {
                let request: UpdateSettingsRequest = serde_json::from_str(&json)?;
                let settings = client.update_settings(&request).await?;
                println!("{}", render(&settings, format, pretty::format_settings));
            }
        },
        Commands::Instruments(cmd) => {
            let instruments = match cmd.action {
                InstrumentsAction::List => client.list_instruments().await?,
                InstrumentsAction::Add { name } => client.add_instrument(&name).await?,
                InstrumentsAction::Rename { name, new_name } => {
                    client.rename_instrument(&name, &new_name).await?
                }
                InstrumentsAction::Remove { name } => {
                    client.remove_instrument(&name).await?;
                    if !cli.quiet {
                        println!("Removed instrument {}", name);
                    }
                    return Ok(());
                }
            };
            println!(
                "{}",
                render(&instruments, format, |i| pretty::format_instruments(i))
            );
        }
        Commands::Stats => {
            let stats = client.get_stats().await?;
            println!("{}", render(&stats, format, pretty::format_stats));
        }
        Commands::Export(ExportArgs { output }) => {
            let bundle = client.export_data().await?;
            let json = format_output(&bundle, format);
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    if !cli.quiet {
                        println!("Exported to {}", path.display());
                    }
                }
                None => println!("{}", json),
            }
        }
        Commands::Import(ImportArgs { file }) => {
            let contents = tokio::fs::read_to_string(&file).await?;
            let bundle: ImportBundle = serde_json::from_str(&contents)?;
            let summary = client.import_data(&bundle).await?;
            println!(
                "{}",
                render(&summary, format, pretty::format_import_summary)
            );
        }
    }

    Ok(())
}

fn song_create_request(title: String, artist: String, fields: SongFields) -> CreateSongRequest {
    let mut request = CreateSongRequest::new(title, artist);
    request.key_letter = fields.key_letter;
    request.key_modifier = fields.key_modifier;
    request.key_mode = fields.key_mode;
    request.bpm = fields.bpm;
    request.youtube_url = fields.youtube_url;
    request
}
