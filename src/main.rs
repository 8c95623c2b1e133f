use codeabode_client::config::{ClientConfig, Credentials};
use codeabode_client::models::Student;
use codeabode_client::ClientState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: codeabode <students [filter] | student <id> | forum | projects>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "codeabode_client=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::new_from_env()?;
    info!("using backend {}", config.base_url);
    let state = ClientState::connect(config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("students");

    // Project listings are public; everything else needs a session.
    if command != "projects" {
        let credentials = Credentials::new_from_env()?;
        match state
            .session
            .login(&credentials.username, &credentials.password)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                eprintln!("{}", codeabode_client::ClientError::NotSignedIn.user_message());
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        }
    }
    println!("{}", state.header());

    let outcome = match command {
        "students" => list_students(&state, args.get(1).map(String::as_str)).await,
        "student" => match args.get(1).and_then(|id| id.parse::<i32>().ok()) {
            Some(id) => show_student(&state, id).await,
            None => {
                eprintln!("{}", USAGE);
                std::process::exit(2);
            }
        },
        "forum" => show_forum(&state).await,
        "projects" => show_projects(&state).await,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn list_students(
    state: &ClientState,
    filter: Option<&str>,
) -> Result<(), codeabode_client::ClientError> {
    let students = state.roster.list_students().await?;
    let shown = match filter {
        Some(query) => state.roster.filter_students(query),
        None => students,
    };
    if shown.is_empty() {
        println!("No students found.");
    }
    for student in shown {
        println!("{:>5}  {}", student.id, student.name);
    }
    Ok(())
}

async fn show_student(state: &ClientState, id: i32) -> Result<(), codeabode_client::ClientError> {
    let student = state.roster.student(id).await?;
    print_student(&student);
    Ok(())
}

fn print_student(student: &Student) {
    let summary = student.progress();
    println!("{} (age {})", student.name, student.age);
    println!("Level: {}", student.current_level);
    println!("Final goal: {}", student.final_goal);
    println!("Notes: {}", student.notes.as_deref().unwrap_or("—"));
    println!(
        "Progress: {}/{} ({}%) · {} methods · {} stretch · {} skills",
        summary.completed, summary.total, summary.percent, summary.methods, summary.stretch, summary.skills
    );
    for class in &student.classes {
        let status = if student.is_current(class.class_id) {
            "current"
        } else {
            class.status.as_str()
        };
        println!("  [{}] {} ({})", class.class_id, class.name, status);
    }
    if !student.future_concepts.is_empty() {
        println!("Future concepts: {}", student.future_concepts.join(", "));
    }
}

async fn show_forum(state: &ClientState) -> Result<(), codeabode_client::ClientError> {
    state.forum.load_questions().await?;
    let questions = state.forum.questions();
    if questions.is_empty() {
        println!("No questions yet. Be the first to ask!");
    }
    for question in questions {
        println!("#{} {} (asked by {})", question.id, question.question, question.student_name);
        for comment in &question.comments {
            println!(
                "    {} · {}",
                comment.comment,
                comment.account_name.as_deref().unwrap_or("anonymous")
            );
        }
    }
    Ok(())
}

async fn show_projects(state: &ClientState) -> Result<(), codeabode_client::ClientError> {
    state.showcase.list_projects().await?;
    let ready = state.showcase.ready_projects();
    if ready.is_empty() {
        println!("No projects published yet. Be the first!");
    }
    for project in ready {
        println!(
            "#{} {} by {} · {} views",
            project.id,
            project.title,
            project.author(),
            project.views
        );
    }
    Ok(())
}
