mod post_login;
mod submission;
