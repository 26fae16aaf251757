use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};

use crate::{
    AppState,
    cli::{
        args::{Commands, EditFields, ProjectFields, RegisterArgs},
        render,
    },
    entities::{
        project::{Project, ProjectForm, ProjectId},
        user::{LoginUser, RegisterUser, User},
    },
    errors::AppError,
    imaging::normalizer::decode_data_uri,
};

/// Runs one command and returns what should be printed.
pub async fn run(command: Commands, state: &AppState) -> Result<String, AppError> {
    let mut input = Prompter::stdin();
    match command {
        Commands::List => Ok(render::gallery(&state.projects.list().await?)),
        Commands::Show { id, focus } => {
            let project = state.projects.get(&parse_id(&id)).await?;
            Ok(render::detail(&project, focus.as_deref()))
        }
        Commands::Login { email, password } => login(state, &mut input, email, password).await,
        Commands::Register(args) => register(state, &mut input, args).await,
        Commands::Logout => {
            state.auth.logout()?;
            Ok("Logged out.\n".to_string())
        }
        Commands::Whoami => match state.auth.restore().await? {
            Some(user) => Ok(render::user_card(&user)),
            None => Ok("Not logged in.\n".to_string()),
        },
        Commands::Create(fields) => create(state, fields).await,
        Commands::Edit { id, fields } => edit(state, &id, fields).await,
        Commands::AddImage { id, file } => {
            let (user, project) = load_for_change(state, &id).await?;
            let appended = state.projects.add_image_file(user.as_ref(), &project, &file).await?;
            Ok(render::detail(&appended.project, Some(&appended.anchor)))
        }
        Commands::AddText { id, text } => {
            let (user, project) = load_for_change(state, &id).await?;
            let appended = state.projects.add_description(user.as_ref(), &project, &text).await?;
            Ok(render::detail(&appended.project, Some(&appended.anchor)))
        }
        Commands::AddTool { id, tool } => {
            let (user, project) = load_for_change(state, &id).await?;
            let project = state.projects.add_tool(user.as_ref(), &project, &tool).await?;
            Ok(render::detail(&project, None))
        }
        Commands::RemoveTool { id, tool, yes } => {
            let (user, project) = load_for_change(state, &id).await?;
            if !yes && !input.confirm(&format!("Remove \"{}\" from \"{}\"?", tool, project.title)).await? {
                return Ok("Cancelled.\n".to_string());
            }
            let project = state.projects.remove_tool(user.as_ref(), &project, &tool).await?;
            Ok(render::detail(&project, None))
        }
        Commands::Delete { id, yes } => {
            let (user, project) = load_for_change(state, &id).await?;
            if !yes && !input.confirm(&format!("Delete \"{}\"? This cannot be undone.", project.title)).await? {
                return Ok("Cancelled.\n".to_string());
            }
            let remaining = state.projects.delete(user.as_ref(), &project).await?;
            Ok(render::gallery(&remaining))
        }
        Commands::Normalize { file, out } => normalize(state, &file, out.as_deref()).await,
    }
}

fn parse_id(raw: &str) -> ProjectId {
    match raw.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

/// The session user, if any, and the project as it is stored right now.
async fn load_for_change(state: &AppState, id: &str) -> Result<(Option<User>, Project), AppError> {
    let user = state.auth.restore().await?;
    let project = state.projects.get(&parse_id(id)).await?;
    Ok((user, project))
}

async fn login<R: AsyncBufRead + Unpin>(
    state: &AppState,
    input: &mut Prompter<R>,
    email: Option<String>,
    password: Option<String>,
) -> Result<String, AppError> {
    let email = match email {
        Some(email) => email,
        None => input.ask("Email: ").await?,
    };
    let password = match password {
        Some(password) => password,
        None => input.ask("Password: ").await?,
    };

    let user = state.auth.login(LoginUser { email, password }).await?;
    Ok(format!("Welcome back, {}.\n", user.display_name()))
}

async fn register<R: AsyncBufRead + Unpin>(
    state: &AppState,
    input: &mut Prompter<R>,
    args: RegisterArgs,
) -> Result<String, AppError> {
    let RegisterArgs { first_name, last_name, email, password } = args;
    let (password, confirm_password) = match password {
        Some(password) => (password.clone(), password),
        None => (input.ask("Password: ").await?, input.ask("Confirm password: ").await?),
    };

    let user = state
        .auth
        .register(RegisterUser { first_name, last_name, email, password, confirm_password })
        .await?;
    Ok(format!("Account created for {}.\n", user.display_name()))
}

async fn create(state: &AppState, fields: ProjectFields) -> Result<String, AppError> {
    let user = state.auth.restore().await?;
    let image = match &fields.image {
        Some(path) => state.projects.prepare_upload(path).await?,
        None => String::new(),
    };

    let form = ProjectForm {
        title: fields.title,
        description: fields.description,
        image,
        date: fields.date,
        technologies: fields.technologies,
        link: fields.link,
    };
    let projects = state.projects.create(user.as_ref(), form).await?;
    Ok(render::gallery(&projects))
}

async fn edit(state: &AppState, id: &str, fields: EditFields) -> Result<String, AppError> {
    let (user, project) = load_for_change(state, id).await?;

    let mut form = ProjectForm::from_project(&project);
    let EditFields { title, description, image, date, technologies, link } = fields;
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(description) = description {
        form.description = description;
    }
    if let Some(path) = image {
        form.image = state.projects.prepare_upload(&path).await?;
    }
    if let Some(date) = date {
        form.date = date;
    }
    if let Some(technologies) = technologies {
        form.technologies = technologies;
    }
    if let Some(link) = link {
        form.link = link;
    }

    let updated = state.projects.update_fields(user.as_ref(), &project, form).await?;
    Ok(render::detail(&updated, None))
}

async fn normalize(state: &AppState, file: &Path, out: Option<&Path>) -> Result<String, AppError> {
    let data_uri = state.projects.prepare_upload(file).await?;
    match out {
        Some(out) => {
            let bytes = decode_data_uri(&data_uri)?;
            tokio::fs::write(out, &bytes).await?;
            Ok(format!("Wrote {} ({} bytes)\n", out.display(), bytes.len()))
        }
        None => Ok(format!("{}\n", data_uri)),
    }
}

/// Line-oriented answers for one command. Every prompt shares the same buffered reader so
/// piped input is consumed one line at a time.
pub struct Prompter<R> {
    input: R,
}

impl Prompter<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Prompter::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(input: R) -> Self {
        Prompter { input }
    }

    /// Prints `label` on stderr and reads one line. End of input reads as an empty answer.
    pub async fn ask(&mut self, label: &str) -> Result<String, AppError> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(label.as_bytes()).await?;
        stderr.flush().await?;

        let mut line = String::new();
        self.input.read_line(&mut line).await?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub async fn confirm(&mut self, question: &str) -> Result<bool, AppError> {
        let answer = self.ask(&format!("{} [y/N] ", question)).await?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}
