use std::sync::Arc;

use anyhow::Result;
use session_for_reqwest::{
    Destination, FileStore, GuardDecision, PageAccess, PostsClient, Session, SessionConfig,
    LOGIN_FAILED,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let username = args.next().expect("usage: board_client <username> <password>");
    let password = args.next().expect("usage: board_client <username> <password>");

    // The file slot plays the part of browser local storage: a second run
    // finds the session still signed in.
    let store = Arc::new(FileStore::new(
        std::env::temp_dir().join("board_client_session"),
    ));

    let session = Session::new(SessionConfig {
        api_base: "http://localhost:4000/api".parse()?,
        federated_authorize_url: "http://localhost:4000/oauth2/authorization/google".parse()?,
        store,
    });

    if !session.is_authenticated() {
        if let Err(e) = session.login(&username, &password).await {
            eprintln!("{}", e.user_message(LOGIN_FAILED));
            eprintln!(
                "or sign in with the browser at {}",
                session.federated_login_url()
            );
            return Ok(());
        }
    }

    if let Some(user) = session.identity().current_user() {
        println!("signed in as {} (id {})", user.username, user.id);
    }

    let editor_access = PageAccess::any_role(["ROLE_WRITER", "ROLE_ADMIN"]);
    match editor_access.evaluate(session.identity()) {
        GuardDecision::Allow => println!("this account may write posts"),
        GuardDecision::Redirect(Destination::Home) => println!("this account is read-only"),
        GuardDecision::Redirect(Destination::Login) => println!("not signed in"),
    }

    let posts = PostsClient::new(session.api().clone());
    for post in posts.list().await? {
        println!("#{} {} by {}", post.id, post.title, post.author_username);
    }

    Ok(())
}
