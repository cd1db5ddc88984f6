use chain_mock::state::ChainState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let host = std::env::var("CHAIN_MOCK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("CHAIN_MOCK_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8545);

    // Default wallet accounts; override with CHAIN_MOCK_ACCOUNTS=a,b,c
    let accounts = std::env::var("CHAIN_MOCK_ACCOUNTS")
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_else(|_| {
            vec![
                "0x742d35Cc6634C0532925a3b844Bc454e4438f44e".to_string(),
                "0x8ba1f109551bD432803012645Ac136ddd64DBA72".to_string(),
            ]
        });

    let state = ChainState::shared(accounts);
    chain_mock::server::run_server(state, host, port).await
}
