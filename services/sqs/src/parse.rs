//! Response parsers, one per operation family.
//!
//! Every parser here is a small tag-name table over the shared streaming
//! contract in [`quesign_core::XmlConsumer`]: `tag_start` opens a per-record
//! accumulator for repeating wrapper elements, `tag_end` routes the closed
//! tag's text into the result.

use quesign_core::{Error, ErrorRecord, Result, XmlConsumer};
use std::collections::HashMap;

/// A message received from a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Service-assigned message identifier.
    pub id: String,
    /// The message payload.
    pub body: String,
}

/// One permission record on a queue.
///
/// The service reports one record per grantee and permission; see
/// [`crate::Client::list_grants`] for the aggregated view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    /// Grantee identifier.
    pub id: String,
    /// Grantee display name.
    pub display_name: String,
    /// Granted permission, e.g. `FULLCONTROL`.
    pub permission: String,
}

/// Maps the status-code text of a plain-status response to a boolean.
#[derive(Default)]
pub(crate) struct StatusParser {
    pub result: Option<bool>,
}

impl XmlConsumer for StatusParser {
    fn reset(&mut self) {
        self.result = None;
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        if name == "StatusCode" {
            self.result = Some(text == "Success");
        }
        Ok(())
    }
}

/// Picks the single text element named at construction, e.g. `QueueUrl`
/// out of a CreateQueue response or `MessageId` out of a send response.
pub(crate) struct TextValueParser {
    tag: &'static str,
    pub result: Option<String>,
}

impl TextValueParser {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, result: None }
    }
}

impl XmlConsumer for TextValueParser {
    fn reset(&mut self) {
        self.result = None;
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        if name == self.tag {
            self.result = Some(text.to_string());
        }
        Ok(())
    }
}

/// Collects every `QueueUrl` element into a list.
#[derive(Default)]
pub(crate) struct ListQueuesParser {
    pub result: Vec<String>,
}

impl XmlConsumer for ListQueuesParser {
    fn reset(&mut self) {
        self.result.clear();
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        if name == "QueueUrl" {
            self.result.push(text.to_string());
        }
        Ok(())
    }
}

/// Collects `Attribute`/`Value` pairs into a mapping.
#[derive(Default)]
pub(crate) struct QueueAttributesParser {
    pub result: HashMap<String, String>,
    current: Option<String>,
}

impl XmlConsumer for QueueAttributesParser {
    fn reset(&mut self) {
        self.result.clear();
        self.current = None;
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        match name {
            "Attribute" => self.current = Some(text.to_string()),
            "Value" => {
                let attribute = self.current.take().ok_or_else(|| {
                    Error::response_invalid("attribute value without an attribute name")
                })?;
                self.result.insert(attribute, text.to_string());
            }
            _ => {}
        }
        Ok(())
    }
}

/// Picks the `VisibilityTimeout` element as an integer.
///
/// A value that does not parse as an integer is a defect in the response and
/// surfaces as an error, never a silent default.
#[derive(Default)]
pub(crate) struct VisibilityTimeoutParser {
    pub result: Option<u64>,
}

impl XmlConsumer for VisibilityTimeoutParser {
    fn reset(&mut self) {
        self.result = None;
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        if name == "VisibilityTimeout" {
            let timeout = text.parse::<u64>().map_err(|e| {
                Error::response_invalid(format!("visibility timeout is not an integer: {text}"))
                    .with_source(e)
            })?;
            self.result = Some(timeout);
        }
        Ok(())
    }
}

/// Collects repeating `GrantList` wrapper elements into grant records.
#[derive(Default)]
pub(crate) struct ListGrantsParser {
    pub result: Vec<Grant>,
    current: Option<Grant>,
}

impl XmlConsumer for ListGrantsParser {
    fn reset(&mut self) {
        self.result.clear();
        self.current = None;
    }

    fn tag_start(&mut self, name: &str) {
        if name == "GrantList" {
            self.current = Some(Grant::default());
        }
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        if name == "GrantList" {
            if let Some(grant) = self.current.take() {
                self.result.push(grant);
            }
        } else if let Some(grant) = &mut self.current {
            match name {
                "ID" => grant.id = text.to_string(),
                "DisplayName" => grant.display_name = text.to_string(),
                "Permission" => grant.permission = text.to_string(),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Collects repeating `Message` wrapper elements into message records,
/// in document order.
#[derive(Default)]
pub(crate) struct ReceiveMessagesParser {
    pub result: Vec<Message>,
    current: Option<Message>,
}

impl XmlConsumer for ReceiveMessagesParser {
    fn reset(&mut self) {
        self.result.clear();
        self.current = None;
    }

    fn tag_start(&mut self, name: &str) {
        if name == "Message" {
            self.current = Some(Message::default());
        }
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        if name == "Message" {
            if let Some(message) = self.current.take() {
                self.result.push(message);
            }
        } else if let Some(message) = &mut self.current {
            match name {
                "MessageId" => message.id = text.to_string(),
                "MessageBody" => message.body = text.to_string(),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Consumes an error-shaped document: repeating `Error` wrappers carrying
/// `Code`/`Message`, plus the service-assigned request identifier.
#[derive(Default)]
pub(crate) struct ErrorResponseParser {
    pub errors: Vec<ErrorRecord>,
    pub request_id: Option<String>,
    current: Option<ErrorRecord>,
}

impl XmlConsumer for ErrorResponseParser {
    fn reset(&mut self) {
        self.errors.clear();
        self.request_id = None;
        self.current = None;
    }

    fn tag_start(&mut self, name: &str) {
        if name == "Error" {
            self.current = Some(ErrorRecord::default());
        }
    }

    fn tag_end(&mut self, name: &str, text: &str) -> Result<()> {
        match name {
            // Both spellings occur in the wild.
            "RequestId" | "RequestID" => self.request_id = Some(text.to_string()),
            "Error" => {
                if let Some(record) = self.current.take() {
                    self.errors.push(record);
                }
            }
            _ => {
                if let Some(record) = &mut self.current {
                    match name {
                        "Code" => record.code = text.to_string(),
                        "Message" => record.message = text.to_string(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quesign_core::parse_xml;
    use test_case::test_case;

    #[test_case("Success", Some(true); "success maps to true")]
    #[test_case("Failure", Some(false); "anything else maps to false")]
    fn test_status(status: &str, expected: Option<bool>) {
        let doc = format!(
            "<DeleteQueueResponse><ResponseStatus><StatusCode>{status}</StatusCode>\
             </ResponseStatus></DeleteQueueResponse>"
        );
        let mut parser = StatusParser::default();
        parse_xml(doc.as_bytes(), &mut parser).unwrap();
        assert_eq!(parser.result, expected);
    }

    #[test]
    fn test_create_queue_url() {
        let doc = br#"<CreateQueueResponse>
            <QueueUrl>http://queue.amazonaws.com/ZZ7XXXYYYBINS/my_queue</QueueUrl>
        </CreateQueueResponse>"#;

        let mut parser = TextValueParser::new("QueueUrl");
        parse_xml(doc, &mut parser).unwrap();
        assert_eq!(
            parser.result.as_deref(),
            Some("http://queue.amazonaws.com/ZZ7XXXYYYBINS/my_queue")
        );
    }

    #[test]
    fn test_list_queues() {
        let doc = br#"<ListQueuesResponse>
            <QueueUrl>http://queue.amazonaws.com/ZZ7XXXYYYBINS/a</QueueUrl>
            <QueueUrl>http://queue.amazonaws.com/ZZ7XXXYYYBINS/b</QueueUrl>
        </ListQueuesResponse>"#;

        let mut parser = ListQueuesParser::default();
        parse_xml(doc, &mut parser).unwrap();
        assert_eq!(
            parser.result,
            vec![
                "http://queue.amazonaws.com/ZZ7XXXYYYBINS/a",
                "http://queue.amazonaws.com/ZZ7XXXYYYBINS/b",
            ]
        );
    }

    #[test]
    fn test_queue_attributes() {
        let doc = br#"<GetQueueAttributesResponse>
            <AttributedValue>
                <Attribute>ApproximateNumberOfMessages</Attribute>
                <Value>0</Value>
            </AttributedValue>
            <AttributedValue>
                <Attribute>VisibilityTimeout</Attribute>
                <Value>30</Value>
            </AttributedValue>
        </GetQueueAttributesResponse>"#;

        let mut parser = QueueAttributesParser::default();
        parse_xml(doc, &mut parser).unwrap();
        assert_eq!(
            parser.result,
            HashMap::from([
                ("ApproximateNumberOfMessages".to_string(), "0".to_string()),
                ("VisibilityTimeout".to_string(), "30".to_string()),
            ])
        );
    }

    #[test]
    fn test_visibility_timeout() {
        let doc = b"<GetVisibilityTimeoutResponse><VisibilityTimeout>15\
            </VisibilityTimeout></GetVisibilityTimeoutResponse>";
        let mut parser = VisibilityTimeoutParser::default();
        parse_xml(doc, &mut parser).unwrap();
        assert_eq!(parser.result, Some(15));
    }

    #[test]
    fn test_visibility_timeout_not_an_integer() {
        let doc = b"<GetVisibilityTimeoutResponse><VisibilityTimeout>soon\
            </VisibilityTimeout></GetVisibilityTimeoutResponse>";
        let mut parser = VisibilityTimeoutParser::default();
        let err = parse_xml(doc, &mut parser).unwrap_err();
        assert_eq!(err.kind(), quesign_core::ErrorKind::ResponseInvalid);
    }

    #[test]
    fn test_list_grants() {
        let doc = br#"<ListGrantsResponse>
            <GrantList>
                <Grantee>
                    <ID>1111</ID>
                    <DisplayName>root</DisplayName>
                </Grantee>
                <Permission>FULLCONTROL</Permission>
            </GrantList>
            <GrantList>
                <Grantee>
                    <ID>2222</ID>
                    <DisplayName>friend</DisplayName>
                </Grantee>
                <Permission>SENDMESSAGE</Permission>
            </GrantList>
        </ListGrantsResponse>"#;

        let mut parser = ListGrantsParser::default();
        parse_xml(doc, &mut parser).unwrap();
        assert_eq!(
            parser.result,
            vec![
                Grant {
                    id: "1111".to_string(),
                    display_name: "root".to_string(),
                    permission: "FULLCONTROL".to_string(),
                },
                Grant {
                    id: "2222".to_string(),
                    display_name: "friend".to_string(),
                    permission: "SENDMESSAGE".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_receive_messages_in_document_order() {
        let doc = br#"<ReceiveMessageResponse>
            <Message>
                <MessageId>12345678904GEZX9746N</MessageId>
                <MessageBody>message_1</MessageBody>
            </Message>
            <Message>
                <MessageId>0N9ED344VK5Z3SV1DTM0</MessageId>
                <MessageBody>message_2</MessageBody>
            </Message>
        </ReceiveMessageResponse>"#;

        let mut parser = ReceiveMessagesParser::default();
        parse_xml(doc, &mut parser).unwrap();
        assert_eq!(
            parser.result,
            vec![
                Message {
                    id: "12345678904GEZX9746N".to_string(),
                    body: "message_1".to_string(),
                },
                Message {
                    id: "0N9ED344VK5Z3SV1DTM0".to_string(),
                    body: "message_2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_error_response() {
        let doc = br#"<ErrorResponse>
            <Error>
                <Code>ServiceUnavailable</Code>
                <Message>Service AmazonSQS is currently unavailable.</Message>
            </Error>
            <Error>
                <Code>InternalError</Code>
                <Message>We encountered an internal service error.</Message>
            </Error>
            <RequestId>b0d1d2af-1e0c-4f1e-b0d8-1d2af1e0c4f1</RequestId>
        </ErrorResponse>"#;

        let mut parser = ErrorResponseParser::default();
        parse_xml(doc, &mut parser).unwrap();

        assert_eq!(parser.errors.len(), 2);
        assert_eq!(parser.errors[0].code, "ServiceUnavailable");
        assert_eq!(
            parser.errors[0].message,
            "Service AmazonSQS is currently unavailable."
        );
        assert_eq!(parser.errors[1].code, "InternalError");
        assert_eq!(
            parser.request_id.as_deref(),
            Some("b0d1d2af-1e0c-4f1e-b0d8-1d2af1e0c4f1")
        );
    }
}
