//! Minimal XML-RPC codec for the single `pingback.ping` call.

use quick_xml::events::Event;
use quick_xml::{Reader, escape::escape};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlRpcError {
    #[error("malformed xml-rpc response: {0}")]
    Malformed(String),
}

/// Decoded `methodResponse`: either a success payload or a declared fault.
#[derive(Debug, PartialEq, Eq)]
pub enum MethodResponse {
    Success,
    Fault { code: i32, message: String },
}

/// Serializes a `pingback.ping(source, target)` call.
pub fn ping_request(source: &str, target: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <methodCall>\n\
         <methodName>pingback.ping</methodName>\n\
         <params>\n\
         <param><value><string>{}</string></value></param>\n\
         <param><value><string>{}</string></value></param>\n\
         </params>\n\
         </methodCall>\n",
        escape(source),
        escape(target)
    )
}

/// Parses a `methodResponse`, distinguishing a fault struct (faultCode +
/// faultString members) from a success payload.
pub fn parse_response(xml: &str) -> Result<MethodResponse, XmlRpcError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();

    let mut saw_method_response = false;
    let mut saw_params = false;
    let mut saw_fault = false;
    let mut element_stack: Vec<Vec<u8>> = Vec::new();
    let mut member_name = String::new();
    let mut fault_code: Option<i32> = None;
    let mut fault_message: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if name == b"methodResponse" {
                    saw_method_response = true;
                } else if name == b"params" {
                    saw_params = true;
                } else if name == b"fault" {
                    saw_fault = true;
                }
                element_stack.push(name);
            }
            Ok(Event::End(_)) => {
                element_stack.pop();
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlRpcError::Malformed(e.to_string()))?
                    .trim()
                    .to_string();
                if text.is_empty() {
                    continue;
                }
                match element_stack.last().map(|n| n.as_slice()) {
                    Some(b"name") => member_name = text,
                    Some(b"int") | Some(b"i4") if saw_fault && member_name == "faultCode" => {
                        fault_code = text.parse().ok();
                    }
                    Some(b"string") if saw_fault && member_name == "faultString" => {
                        fault_message = Some(text);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlRpcError::Malformed(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if saw_fault {
        let code = fault_code
            .ok_or_else(|| XmlRpcError::Malformed("fault without faultCode".to_string()))?;
        return Ok(MethodResponse::Fault {
            code,
            message: fault_message.unwrap_or_default(),
        });
    }
    // Anything short of a real methodResponse payload is not a success:
    // receivers misbehave, and an HTML error page can arrive with HTTP 200.
    if saw_method_response && saw_params {
        return Ok(MethodResponse::Success);
    }
    Err(XmlRpcError::Malformed(
        "response is not a methodResponse with a params payload".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_escapes_urls() {
        let body = ping_request("http://a/?x=1&y=2", "http://b/");
        assert!(body.contains("pingback.ping"));
        assert!(body.contains("http://a/?x=1&amp;y=2"));
        assert!(!body.contains("x=1&y"));
    }

    #[test]
    fn parses_success_response() {
        let xml = r#"<?xml version="1.0"?>
        <methodResponse><params>
            <param><value><string>Pingback registered.</string></value></param>
        </params></methodResponse>"#;
        assert_eq!(parse_response(xml).unwrap(), MethodResponse::Success);
    }

    #[test]
    fn parses_fault_response() {
        let xml = r#"<?xml version="1.0"?>
        <methodResponse><fault>
            <value><struct>
                <member><name>faultCode</name><value><int>48</int></value></member>
                <member><name>faultString</name>
                    <value><string>The pingback has already been registered.</string></value></member>
            </struct></value>
        </fault></methodResponse>"#;
        assert_eq!(
            parse_response(xml).unwrap(),
            MethodResponse::Fault {
                code: 48,
                message: "The pingback has already been registered.".to_string()
            }
        );
    }

    #[test]
    fn parses_fault_with_i4_code() {
        let xml = r#"<methodResponse><fault><value><struct>
            <member><name>faultCode</name><value><i4>0</i4></value></member>
            <member><name>faultString</name><value><string>Unexpected error.</string></value></member>
        </struct></value></fault></methodResponse>"#;
        assert_eq!(
            parse_response(xml).unwrap(),
            MethodResponse::Fault {
                code: 0,
                message: "Unexpected error.".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_xmlrpc_bodies() {
        assert!(parse_response("OK").is_err());
        assert!(parse_response("<html><body>It works!</body></html>").is_err());
        assert!(parse_response("").is_err());
    }

    #[test]
    fn rejects_method_response_without_payload() {
        assert!(parse_response("<methodResponse></methodResponse>").is_err());
    }

    #[test]
    fn rejects_fault_without_code() {
        let xml = "<methodResponse><fault><value><struct></struct></value></fault></methodResponse>";
        assert!(parse_response(xml).is_err());
    }
}
