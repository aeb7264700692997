use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use tfbootstrap::config::working_dir;
use tfbootstrap::provisioners::terraform::TerraformProvisioner;
use tfbootstrap::{BootstrapError, Config, Generator, OutputFormat, OutputNames, ToolKind};

#[derive(Parser, Debug)]
#[command(name = "tfbootstrap")]
#[command(
    about = "Apply the bootstrap module and generate the S3 backend configuration",
    long_about = None
)]
struct Cli {
    /// Directory holding the bootstrap module [default: <infrastructure-dir>/../bootstrap]
    #[arg(long, env = "TFBOOTSTRAP_BOOTSTRAP_DIR")]
    bootstrap_dir: Option<PathBuf>,

    /// Directory that receives the backend file [default: current directory]
    #[arg(long, env = "TFBOOTSTRAP_INFRASTRUCTURE_DIR")]
    infrastructure_dir: Option<PathBuf>,

    /// Provisioning tool (terraform or tofu)
    #[arg(long, default_value = "terraform", env = "TFBOOTSTRAP_TOOL")]
    tool: ToolKind,

    /// Explicit path to the tool binary
    #[arg(long, env = "TFBOOTSTRAP_TOOL_PATH")]
    tool_path: Option<PathBuf>,

    /// Backend file name [default: backend.tf, or backend.tf.json for json]
    #[arg(long, env = "TFBOOTSTRAP_OUTPUT_FILE")]
    output_file: Option<String>,

    /// Backend file syntax (hcl or json)
    #[arg(long, default_value = "hcl", env = "TFBOOTSTRAP_FORMAT")]
    format: OutputFormat,

    /// State object key inside the bucket
    #[arg(
        long,
        default_value = tfbootstrap::config::DEFAULT_STATE_KEY,
        env = "TFBOOTSTRAP_STATE_KEY"
    )]
    state_key: String,

    /// Write `encrypt = false`
    #[arg(long, env = "TFBOOTSTRAP_NO_ENCRYPT")]
    no_encrypt: bool,

    /// Output holding the bucket name
    #[arg(long, default_value = "tf_state_bucket_name", env = "TFBOOTSTRAP_BUCKET_OUTPUT")]
    bucket_output: String,

    /// Output holding the region
    #[arg(long, default_value = "region", env = "TFBOOTSTRAP_REGION_OUTPUT")]
    region_output: String,

    /// Output holding the lock table name
    #[arg(long, default_value = "tf_state_lock_table", env = "TFBOOTSTRAP_LOCK_TABLE_OUTPUT")]
    lock_table_output: String,

    /// Only read outputs; do not run init/apply
    #[arg(long, env = "TFBOOTSTRAP_SKIP_PROVISION")]
    skip_provision: bool,

    /// Print the backend file instead of writing it
    #[arg(long, env = "TFBOOTSTRAP_DRY_RUN")]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> tfbootstrap::Result<Config> {
        let cwd = working_dir()?;
        let mut config = match self.infrastructure_dir {
            Some(dir) => Config::new(dir),
            None => Config::new(&cwd),
        };

        if let Some(dir) = self.bootstrap_dir {
            config = config.with_bootstrap_dir(dir);
        }
        if let Some(path) = self.tool_path {
            config = config.with_tool_path(path);
        }
        if let Some(name) = self.output_file {
            config = config.with_output_file(name);
        }

        Ok(config
            .with_tool(self.tool)
            .with_format(self.format)
            .with_state_key(self.state_key)
            .with_encrypt(!self.no_encrypt)
            .with_output_names(OutputNames {
                bucket: self.bucket_output,
                region: self.region_output,
                lock_table: self.lock_table_output,
            })
            .with_skip_provision(self.skip_provision)
            .with_dry_run(self.dry_run)
            .resolve_tool_path(&cwd))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> tfbootstrap::Result<()> {
    let config = cli.into_config()?;
    let tool = TerraformProvisioner::new(&config);

    let generated = Generator::new(config, tool).run().await?;

    if generated.written {
        println!("Generated {}", generated.path.display());
    } else {
        print!("{}", generated.contents);
    }
    Ok(())
}

fn report(err: &BootstrapError) {
    eprintln!("Error: [{}] {}", err.stage(), err);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(e.exit_code());
    }
}
