use axum::response::Html;

const BANNER: &str = "<!DOCTYPE html>\
<html><head><title>parchment</title></head>\
<body><h1>parchment</h1>\
<p>Document question-answering backend is running.</p>\
<p>POST files to <code>/upload</code>, questions to <code>/query</code>.</p>\
</body></html>";

pub async fn root_handler() -> Html<&'static str> {
    Html(BANNER)
}
