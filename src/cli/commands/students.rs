use clap::{Args, Subcommand};

use crate::cli::context::{CliContext, StdinConfirm};
use crate::cli::output::{output_table, output_value};
use crate::cli::OutputFormat;
use crate::console::Page;
use crate::mutation::{Confirm, EditState, FixedAnswer, StudentForm};
use crate::routing::Route;
use crate::views::{CourseFilter, StudentsView};

#[derive(Subcommand)]
pub enum StudentCommands {
    #[command(about = "List students with their course")]
    List {
        #[arg(long, default_value = "all", help = "Course id to filter by, or 'all'")]
        course: String,
    },

    #[command(about = "Add a student")]
    Add {
        #[command(flatten)]
        fields: StudentArgs,
    },

    #[command(about = "Rewrite a student; omitted fields keep their current value")]
    Update {
        #[arg(help = "Student id")]
        id: String,
        #[command(flatten)]
        fields: StudentArgs,
    },

    #[command(about = "Delete a student")]
    Delete {
        #[arg(help = "Student id")]
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Args, Default)]
pub struct StudentArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long, help = "Course id")]
    pub course: Option<String>,
}

impl StudentArgs {
    fn apply(self, form: &mut StudentForm) {
        let Self {
            name,
            email,
            gender,
            contact,
            course,
        } = self;
        for (target, value) in [
            (&mut form.name, name),
            (&mut form.email, email),
            (&mut form.gender, gender),
            (&mut form.contact, contact),
            (&mut form.course_id, course),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

async fn students_view(ctx: &CliContext) -> anyhow::Result<StudentsView> {
    match ctx.open(Route::Students).await? {
        Page::Students(view) => Ok(view),
        _ => anyhow::bail!("unexpected page for {}", Route::Students.path()),
    }
}

pub async fn handle(server: Option<&str>, cmd: StudentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut ctx = CliContext::connect(server, output_format).await?;
    let mut view = students_view(&ctx).await?;

    match cmd {
        StudentCommands::List { course } => {
            view.filter = course.parse::<CourseFilter>()?;
            let rows = view.rows();
            output_value(&ctx.output_format, &rows, || {
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.clone(),
                            r.name.clone(),
                            r.email.clone(),
                            r.gender.clone(),
                            r.contact.clone(),
                            r.course.clone(),
                        ]
                    })
                    .collect();
                output_table(
                    &["ID", "NAME", "EMAIL", "GENDER", "CONTACT", "COURSE"],
                    &table,
                    "No students found",
                );
                Ok(())
            })
        }
        StudentCommands::Add { fields } => {
            let mut form = StudentForm::default();
            fields.apply(&mut form);
            let status = ctx.console.pipeline().create_student(&mut form).await;
            ctx.report(status)
        }
        StudentCommands::Update { id, fields } => {
            let student = view
                .find(&id)
                .ok_or_else(|| anyhow::anyhow!("Student '{}' not found", id))?;
            let mut edit = EditState::default();
            edit.begin(&student);
            fields.apply(&mut edit.form);
            let status = ctx.console.pipeline().update_student(&mut edit).await;
            ctx.report(status)
        }
        StudentCommands::Delete { id, yes } => {
            let name = view.find(&id).map(|s| s.name).unwrap_or_else(|| id.clone());
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(FixedAnswer(true))
            } else {
                Box::new(StdinConfirm)
            };
            let status = ctx.console.pipeline().delete_student(&id, &name, confirm.as_ref()).await;
            ctx.report(status)
        }
    }
}
