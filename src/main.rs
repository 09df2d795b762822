use clap::{Parser, Subcommand};
use got::areas::repository::Repository;
use got::commands::porcelain::log::LogOptions;
use got::errors::error_kind;
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "got",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressable version control system",
    long_about = "got stores snapshots of a directory as hash-addressed objects. \
    It keeps a staging index, branches and tags, and can check any commit back out.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates an empty repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints an object after peeling it to the requested kind. \
        Blobs are printed raw, trees as a listing."
    )]
    CatFile {
        #[arg(index = 1, help = "The object kind (blob, tree, commit or tag)")]
        kind: String,
        #[arg(index = 2, help = "The object to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object kind")]
        kind: String,
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "The tree, commit or tag to list")]
        tree_ish: String,
    },
    #[command(name = "ls-files", about = "List the files in the index")]
    LsFiles {
        #[arg(short, long, help = "Show mode, object id, stage, size and mtime")]
        verbose: bool,
    },
    #[command(name = "rev-parse", about = "Resolve a revision to an object id")]
    RevParse {
        #[arg(short = 't', long = "type", help = "Peel the object to this kind")]
        kind: Option<String>,
        #[arg(index = 1)]
        spec: String,
    },
    #[command(name = "show-ref", about = "List references and the objects they point to")]
    ShowRef,
    #[command(name = "check-ignore", about = "Print the paths excluded by ignore rules")]
    CheckIgnore {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    #[command(name = "write-tree", about = "Create a tree object from the index")]
    WriteTree,
    #[command(
        name = "add",
        about = "Add files to the index",
        long_about = "This command stages files. Directories are expanded recursively and ignored paths are skipped."
    )]
    Add {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Remove files from the index and the working tree")]
    Rm {
        #[arg(long, help = "Only remove the files from the index")]
        cached: bool,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit from the index and advances the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(long, help = "One commit per line")]
        oneline: bool,
        #[arg(long = "name-status", help = "List the paths each commit changed")]
        name_status: bool,
        #[arg(index = 1, help = "The commit to start from (HEAD by default)")]
        revision: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Check out a commit",
        long_about = "This command writes the tree of a commit into the working tree (moving HEAD) \
        or into another directory."
    )]
    Checkout {
        #[arg(short, long, help = "Overwrite local changes and untracked files")]
        force: bool,
        #[arg(index = 1)]
        target: String,
        #[arg(index = 2, help = "Directory to check out into (the working tree by default)")]
        directory: Option<String>,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine-readable output")]
        porcelain: bool,
    },
    #[command(name = "tag", about = "List or create tags")]
    Tag {
        #[arg(short, long, requires = "message", help = "Create an annotated tag")]
        annotate: bool,
        #[arg(short, long, help = "The tag message (implies --annotate)")]
        message: Option<String>,
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2)]
        target: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    got::telemetry::init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    let result = run(cli).await;
    let _ = std::io::stdout().flush();

    if let Err(err) = result {
        eprintln!("fatal: {err:#}");
        let code = error_kind(&err).map(|kind| kind.exit_code()).unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pwd = std::env::current_dir()?;

    let stdout = Box::new(std::io::stdout());
    let mut repository = match &cli.command {
        Commands::Init { path } => Repository::new(path.as_deref().unwrap_or(&pwd), stdout)?,
        _ => Repository::discover(&pwd, stdout)?,
    };

    match &cli.command {
        Commands::Init { .. } => repository.init().await?,
        Commands::CatFile { kind, object } => repository.cat_file(kind, object)?,
        Commands::HashObject { write, kind, file } => repository.hash_object(file, kind, *write)?,
        Commands::LsTree {
            recursive,
            tree_ish,
        } => repository.ls_tree(tree_ish, *recursive)?,
        Commands::LsFiles { verbose } => repository.ls_files(*verbose).await?,
        Commands::RevParse { kind, spec } => repository.rev_parse(spec, kind.as_deref())?,
        Commands::ShowRef => repository.show_ref()?,
        Commands::CheckIgnore { paths } => repository.check_ignore(paths)?,
        Commands::WriteTree => repository.write_tree().await?,
        Commands::Add { paths } => repository.add(paths).await?,
        Commands::Rm { cached, paths } => repository.rm(paths, *cached).await?,
        Commands::Commit { message } => repository.commit(message).await?,
        Commands::Log {
            oneline,
            name_status,
            revision,
        } => {
            let opts = LogOptions {
                oneline: *oneline,
                name_status: *name_status,
            };
            repository.log(revision.as_deref(), &opts)?
        }
        Commands::Checkout {
            force,
            target,
            directory,
        } => {
            repository
                .checkout(target, directory.as_deref(), *force)
                .await?
        }
        Commands::Status { porcelain } => repository.status(*porcelain).await?,
        Commands::Tag {
            annotate,
            message,
            name,
            target,
        } => repository.tag(
            name.as_deref(),
            target.as_deref(),
            *annotate,
            message.as_deref(),
        )?,
    }

    Ok(())
}
