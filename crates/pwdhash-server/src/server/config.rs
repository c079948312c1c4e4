use anyhow::bail;
use clap::Parser;
use core::{net::SocketAddr, time::Duration};
use pwdhash::ServiceConfig;
use std::net::IpAddr;

/// Runtime configuration for the `pwdhash-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first), with defaults
/// suitable for a single-node deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pwdhash-server",
    version,
    about = "An HTTP service that hashes passwords on a background worker pool"
)]
pub struct CliArgs {
    /// Number of worker tasks computing digests concurrently.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 100)]
    pub num_workers: usize,

    /// Capacity of the job queue between request handlers and workers.
    ///
    /// Once the queue is full, `POST /hash` waits for a free slot before
    /// responding.
    ///
    /// Environment variable: `BUFFER_SIZE`
    #[arg(long, env = "BUFFER_SIZE", default_value_t = 1000)]
    pub buffer_size: usize,

    /// Maximum accepted password length, counted in characters.
    ///
    /// Environment variable: `MAX_PWD_LENGTH`
    #[arg(long, env = "MAX_PWD_LENGTH", default_value_t = 64)]
    pub max_pwd_length: usize,

    /// Address to listen on.
    ///
    /// Environment variable: `HTTP_HOST`
    #[arg(long, env = "HTTP_HOST", default_value_t = IpAddr::from([0, 0, 0, 0]))]
    pub http_host: IpAddr,

    /// Port to listen on.
    ///
    /// Environment variable: `HTTP_PORT`
    #[arg(long, env = "HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    /// Artificial delay, in milliseconds, before each digest is computed.
    ///
    /// Environment variable: `JOB_DELAY_MS`
    #[arg(long, env = "JOB_DELAY_MS", default_value_t = 5000)]
    pub job_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
    pub service: ServiceConfig,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.buffer_size == 0 {
            bail!("BUFFER_SIZE must be greater than 0");
        }

        if args.max_pwd_length == 0 {
            bail!("MAX_PWD_LENGTH must be greater than 0");
        }

        Ok(Self {
            server_addr: SocketAddr::new(args.http_host, args.http_port),
            service: ServiceConfig {
                num_workers: args.num_workers,
                queue_capacity: args.buffer_size,
                max_input_len: args.max_pwd_length,
                job_delay: Duration::from_millis(args.job_delay_ms),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(core::iter::once("pwdhash-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_from(parse(&[
            "--num-workers",
            "4",
            "--buffer-size",
            "16",
            "--max-pwd-length",
            "32",
            "--http-host",
            "127.0.0.1",
            "--http-port",
            "9000",
            "--job-delay-ms",
            "250",
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(
            config.service,
            ServiceConfig {
                num_workers: 4,
                queue_capacity: 16,
                max_input_len: 32,
                job_delay: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = ServerConfig::try_from(parse(&["--num-workers", "0"])).unwrap_err();
        assert!(err.to_string().contains("NUM_WORKERS"), "{err}");
    }

    #[test]
    fn zero_buffer_is_rejected() {
        let err = ServerConfig::try_from(parse(&["--buffer-size", "0"])).unwrap_err();
        assert!(err.to_string().contains("BUFFER_SIZE"), "{err}");
    }

    #[test]
    fn zero_max_length_is_rejected() {
        let err = ServerConfig::try_from(parse(&["--max-pwd-length", "0"])).unwrap_err();
        assert!(err.to_string().contains("MAX_PWD_LENGTH"), "{err}");
    }

    #[test]
    fn malformed_port_fails_to_parse() {
        let res = CliArgs::try_parse_from(["pwdhash-server", "--http-port", "http"]);
        assert!(res.is_err());
    }
}
