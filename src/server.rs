use std::io::{self, BufReader};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Instant;

use crate::http::{read_request, write_response, BoxHandler, HttpError, Request, Response};
use crate::{log_error, log_request, log_response};

/// End of the handler chain: anything that gets here was not served.
pub fn not_found(_: &Request) -> Response {
    Response::text(404, "Not Found")
}

pub fn start_server(listen_addr: &str, handler: BoxHandler) -> io::Result<()> {
    let listener = TcpListener::bind(listen_addr)?;
    log::info!("Listening on: {}", listener.local_addr()?);
    serve(listener, handler)
}

/// Accepts connections forever, one thread per connection.
pub fn serve(listener: TcpListener, handler: BoxHandler) -> io::Result<()> {
    for stream in listener.incoming() {
        let stream = stream?;
        let handler = handler.clone();

        thread::spawn(move || {
            if let Err(e) = handle_connection(stream, &handler) {
                log_error!(e, "Error handling connection");
            }
        });
    }

    Ok(())
}

fn handle_connection(client: TcpStream, handler: &BoxHandler) -> io::Result<()> {
    let start_time = Instant::now();
    let mut reader = BufReader::new(&client);
    let mut writer = &client;

    let request = match read_request(&mut reader) {
        Ok(request) => request,
        Err(HttpError::UnexpectedEof) => {
            log::debug!("Connection closed before a full request arrived");
            return Ok(());
        }
        Err(HttpError::Io(e)) => return Err(e),
        Err(e) => {
            log::warn!("Rejecting request: {}", e);
            return write_response(&mut writer, &Response::text(400, "Bad Request"), true);
        }
    };
    log_request!(request.method, request.path);

    let response = handler.handle(&request);
    write_response(&mut writer, &response, request.method != "HEAD")?;

    log_response!(
        response.status,
        start_time.elapsed(),
        response.body.len(),
        response.header("Content-Encoding").unwrap_or("identity")
    );
    Ok(())
}
